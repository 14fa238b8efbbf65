//! Whole-run orchestration.
//!
//! A patch run holds the workspace lock, resolves the profile
//! (built-in < settings file < flags), runs [`PATCH_SEQUENCE`] and finally
//! the compiler and genesis generator. The first fatal error stops the run
//! and leaves earlier routines applied; `recover` undoes them.

use std::path::{Path, PathBuf};

use genesis_edit::{AnnotateConfig, AnnotateStats, SignatureAnnotator};
use genesis_io::{
    BackupStore, DEFAULT_BACKUP_EXTENSION, DEFAULT_SOURCE_EXTENSION, WorkspaceLock,
};
use serde::Serialize;

use crate::config::{CONTRACTS_DIR, GenesisSettings};
use crate::contracts::{ContractPatch, PATCH_SEQUENCE, PatchContext, patch_contract};
use crate::error::Result;
use crate::profile::{Network, ParameterProfile, ProfileOverrides};
use crate::templates::TemplateRenderer;
use crate::toolchain::Toolchain;

/// Per-invocation options of a patch run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Target environment.
    pub network: Network,
    /// Command-line overrides (highest precedence).
    pub overrides: ProfileOverrides,
    /// Patch only; do not build or generate the genesis file.
    pub skip_genesis: bool,
    /// Compute diffs without writing, backing up, or building.
    pub dry_run: bool,
}

impl RunOptions {
    /// Defaults for `network`: no overrides, full run.
    #[must_use]
    pub fn new(network: Network) -> Self {
        Self {
            network,
            overrides: ProfileOverrides::default(),
            skip_genesis: false,
            dry_run: false,
        }
    }
}

/// Result of a patch run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Target environment.
    pub network: Network,
    /// Decimal chain id.
    pub chain_id: u64,
    /// Chain id as patched into `System.sol`.
    pub hex_chain_id: String,
    /// Whether nothing was written.
    pub dry_run: bool,
    /// One entry per routine that ran, in order.
    pub contracts: Vec<ContractPatch>,
    /// Generated genesis file, when the toolchain ran.
    pub genesis: Option<PathBuf>,
}

impl RunReport {
    /// Total edits across all contracts.
    #[must_use]
    pub fn total_edits(&self) -> usize {
        self.contracts.iter().map(|c| c.patch.count).sum()
    }
}

/// Result of a recovery.
#[derive(Debug, Default, Serialize)]
pub struct RecoveryReport {
    /// Sources restored from backups.
    pub restored: Vec<PathBuf>,
}

/// Entry point for every operation against one work dir.
#[derive(Debug, Clone)]
pub struct GenesisRunner {
    work_dir: PathBuf,
    settings: GenesisSettings,
}

impl GenesisRunner {
    /// Runner for `work_dir` configured by `settings`.
    pub fn new<P: Into<PathBuf>>(work_dir: P, settings: GenesisSettings) -> Self {
        Self {
            work_dir: work_dir.into(),
            settings,
        }
    }

    /// Work dir.
    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Directory holding the patched sources.
    #[must_use]
    pub fn contracts_dir(&self) -> PathBuf {
        self.work_dir
            .join(self.settings.contracts_dir.as_deref().unwrap_or(CONTRACTS_DIR))
    }

    /// Backup store over [`GenesisRunner::contracts_dir`].
    #[must_use]
    pub fn backup_store(&self) -> BackupStore {
        BackupStore::new(self.contracts_dir()).with_extensions(
            self.settings
                .source_extension
                .as_deref()
                .unwrap_or(DEFAULT_SOURCE_EXTENSION),
            self.settings
                .backup_extension
                .as_deref()
                .unwrap_or(DEFAULT_BACKUP_EXTENSION),
        )
    }

    /// External tools bound to the work dir.
    #[must_use]
    pub fn toolchain(&self) -> Toolchain {
        Toolchain::from_settings(&self.work_dir, &self.settings.toolchain)
    }

    /// Template renderer bound to the work dir.
    #[must_use]
    pub fn renderer(&self) -> TemplateRenderer {
        TemplateRenderer::new(&self.work_dir)
    }

    /// Built-in profile for `network` layered with settings and `overrides`.
    #[must_use]
    pub fn resolve_profile(
        &self,
        network: Network,
        overrides: ProfileOverrides,
    ) -> ParameterProfile {
        let merged = self.settings.overrides_for(network).merge(overrides);
        network.profile().with_overrides(merged)
    }

    /// Patch every contract for `options.network`, then build and generate
    /// the genesis file.
    ///
    /// # Errors
    /// `Locked` when another run holds the work dir, `AnchorNotFound` and
    /// other edit failures, `ValidatorSet`, and subprocess failures.
    pub fn run(&self, options: &RunOptions) -> Result<RunReport> {
        let _lock = if options.dry_run {
            None
        } else {
            Some(WorkspaceLock::acquire(&self.work_dir)?)
        };

        let mut profile = self.resolve_profile(options.network, options.overrides.clone());
        if profile.init_validator_set_bytes.is_none() {
            tracing::info!(network = %options.network, "resolving validator set bytes");
            profile.init_validator_set_bytes = Some(self.toolchain().validator_set_bytes()?);
        }

        tracing::info!(
            network = %options.network,
            chain_id = profile.chain_id,
            dry_run = options.dry_run,
            "patching genesis contracts"
        );

        let backups = self.backup_store();
        let ctx = PatchContext {
            network: options.network,
            profile: &profile,
            backups: &backups,
            edit: self.settings.edit_config(options.dry_run),
        };

        let mut contracts = Vec::new();
        for contract in PATCH_SEQUENCE {
            if let Some(patch) = patch_contract(contract, &ctx)? {
                contracts.push(patch);
            }
        }

        let genesis = if options.skip_genesis || options.dry_run {
            None
        } else {
            Some(self.generate_genesis(options.network, &profile)?)
        };

        Ok(RunReport {
            network: options.network,
            chain_id: profile.chain_id,
            hex_chain_id: profile.hex_chain_id(),
            dry_run: options.dry_run,
            contracts,
            genesis,
        })
    }

    fn generate_genesis(&self, network: Network, profile: &ParameterProfile) -> Result<PathBuf> {
        let toolchain = self.toolchain();
        let output = network.genesis_output();
        toolchain.forge_build()?;
        toolchain.generate_genesis(
            profile.chain_id,
            profile.ens_registry_owner.as_deref(),
            output,
        )?;
        let path = self.work_dir.join(output);
        tracing::info!(network = %network, output = %path.display(), "genesis generated");
        Ok(path)
    }

    /// Restore every backed-up contract and delete the backups.
    ///
    /// # Errors
    /// `Locked` when a run is in progress, listing or rename failures.
    pub fn recover(&self) -> Result<RecoveryReport> {
        let _lock = WorkspaceLock::acquire(&self.work_dir)?;
        let report = self.backup_store().recover()?;
        tracing::info!(restored = report.restored.len(), "recovered from backups");
        Ok(RecoveryReport {
            restored: report.restored,
        })
    }

    /// Annotate `error` declarations under `dir` (relative to the work dir).
    ///
    /// # Errors
    /// `NotFound` for a missing directory, `InvalidGlob` for a bad glob.
    pub fn annotate(
        &self,
        dir: &Path,
        glob: &str,
        recursive: bool,
        dry_run: bool,
    ) -> Result<AnnotateStats> {
        let config = AnnotateConfig {
            file_glob: glob.to_string(),
            recursive,
            edit: self.settings.edit_config(dry_run),
        };
        Ok(SignatureAnnotator::annotate_dir(&self.work_dir.join(dir), &config)?)
    }
}
