//! l2p-genesis CLI: patch genesis contracts for mainnet, testnet or dev.
//!
//! Settings come from `genesis.yaml` in the work dir (override with `--config <path>`;
//! an explicit file must exist and parse).
//!
//! Logging: set `RUST_LOG=l2p_genesis=debug` (or `warn`, `info`) to see patch logs on stderr.

mod cli;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use l2p_genesis::{
    GenesisRunner, Network, RunOptions, RunReport, load_settings_for, resolve_work_dir,
};

use crate::cli::{Cli, Command, NetworkArgs};

fn main() -> anyhow::Result<()> {
    let Cli {
        root,
        config,
        dry_run,
        json,
        verbose,
        command,
    } = Cli::parse();

    // Initialize tracing: RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "l2p_genesis=debug,genesis_edit=debug,genesis_io=debug"
        } else {
            "l2p_genesis=info,genesis_edit=info,genesis_io=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let work_dir = resolve_work_dir(root);
    let settings =
        load_settings_for(&work_dir, config.as_deref()).context("failed to load settings")?;
    let runner = GenesisRunner::new(work_dir, settings);

    match command {
        Command::Mainnet(args) => run_network(&runner, Network::Mainnet, args, dry_run, json),
        Command::Testnet(args) => run_network(&runner, Network::Testnet, args, dry_run, json),
        Command::Dev(args) => run_network(&runner, Network::Dev, args, dry_run, json),
        Command::Recover => {
            let report = runner.recover().context("recover failed")?;
            emit(json, &report, || {
                format!(
                    "Recover from the backup successfully ({} files)",
                    report.restored.len()
                )
            })
        }
        Command::GenerateErrorSig {
            dir_path,
            glob,
            recursive,
        } => {
            let stats = runner
                .annotate(&dir_path, &glob, recursive, dry_run)
                .context("generate-error-sig failed")?;
            for (path, error) in &stats.errors {
                tracing::error!(path = %path, error = %error, "file not annotated");
            }
            emit(json, &stats, || {
                format!(
                    "Generate errors signature successfully ({} declarations, {} files changed)",
                    stats.declarations, stats.files_changed
                )
            })?;
            if stats.errors.is_empty() {
                Ok(())
            } else {
                anyhow::bail!("{} files could not be annotated", stats.errors.len())
            }
        }
        Command::GenerateInitHolders {
            init_holders,
            template_file,
            output_file,
        } => {
            let output = runner
                .renderer()
                .generate_init_holders(&init_holders, &template_file, &output_file)
                .context("generate-init-holders failed")?;
            emit(json, &output, || {
                "Generate init holders successfully".to_string()
            })
        }
        Command::GenerateValidators {
            file_path,
            template_file,
            output_file,
        } => {
            let output = runner
                .renderer()
                .generate_validators(&file_path, &template_file, &output_file)
                .context("generate-validators failed")?;
            emit(json, &output, || "Generate validators successfully".to_string())
        }
    }
}

fn run_network(
    runner: &GenesisRunner,
    network: Network,
    args: NetworkArgs,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let options = RunOptions {
        network,
        overrides: args.overrides,
        skip_genesis: args.skip_genesis,
        dry_run,
    };
    let report = runner
        .run(&options)
        .with_context(|| format!("{network} run failed; use `recover` to restore the contracts"))?;

    if dry_run && !json {
        print_diffs(&report);
    }
    emit(json, &report, || success_message(&report))
}

fn success_message(report: &RunReport) -> String {
    let target = match report.network {
        Network::Mainnet => "mainnet",
        Network::Testnet => "testnet",
        Network::Dev => "dev environment",
    };
    if report.dry_run {
        format!("Dry run for {target}: {} edits", report.total_edits())
    } else if report.genesis.is_some() {
        format!("Generate genesis of {target} successfully")
    } else {
        format!("Generate contracts of {target} successfully")
    }
}

fn print_diffs(report: &RunReport) {
    for contract in &report.contracts {
        if !contract.patch.diff.is_empty() {
            println!("{}", contract.patch.diff);
        }
    }
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    message: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", message());
    }
    Ok(())
}
