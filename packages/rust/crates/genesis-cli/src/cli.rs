use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use l2p_genesis::{
    DEFAULT_INIT_HOLDERS_OUTPUT, DEFAULT_INIT_HOLDERS_TEMPLATE, DEFAULT_VALIDATORS_CONF,
    DEFAULT_VALIDATORS_OUTPUT, DEFAULT_VALIDATORS_TEMPLATE, ProfileOverrides,
};

#[derive(Parser)]
#[command(name = "l2p-genesis")]
#[command(about = "Patch L2P genesis contracts per network and generate genesis files.")]
pub(crate) struct Cli {
    /// Work dir (default: PRJ_ROOT, else the current directory without a trailing `scripts`).
    #[arg(long, global = true)]
    pub(crate) root: Option<PathBuf>,

    /// Settings file (default: <root>/genesis.yaml).
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Show diffs instead of writing files; no backups, no toolchain.
    #[arg(long, global = true)]
    pub(crate) dry_run: bool,

    /// Print the report as JSON on stdout.
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// Debug logging (RUST_LOG still wins).
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct NetworkArgs {
    /// Patch contracts only; skip `forge build` and genesis generation.
    #[arg(long)]
    pub(crate) skip_genesis: bool,

    #[command(flatten)]
    pub(crate) overrides: ProfileOverrides,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate contracts and genesis for L2P mainnet.
    Mainnet(NetworkArgs),
    /// Generate contracts and genesis for L2P testnet.
    Testnet(NetworkArgs),
    /// Generate contracts and genesis for a dev chain (`--dev-chain-id`, default 714).
    Dev(NetworkArgs),
    /// Restore every contract from its backup and delete the backups.
    Recover,
    /// Annotate `error` declarations with their 4-byte selectors.
    GenerateErrorSig {
        /// Directory of sources, relative to the work dir.
        #[arg(long, default_value = "./contracts")]
        dir_path: PathBuf,

        /// File name glob of sources to annotate.
        #[arg(long, default_value = "*.sol")]
        glob: String,

        /// Descend into subdirectories.
        #[arg(long)]
        recursive: bool,
    },
    /// Render the init holders script.
    GenerateInitHolders {
        /// Addresses separated by commas.
        init_holders: String,

        #[arg(long, default_value = DEFAULT_INIT_HOLDERS_TEMPLATE)]
        template_file: PathBuf,

        #[arg(long, default_value = DEFAULT_INIT_HOLDERS_OUTPUT)]
        output_file: PathBuf,
    },
    /// Render the validators script from a validators config.
    GenerateValidators {
        /// Validators config: consensusAddr,feeAddr,l2pFeeAddr,votingPower,bLSPublicKey per line.
        #[arg(long, default_value = DEFAULT_VALIDATORS_CONF)]
        file_path: PathBuf,

        #[arg(long, default_value = DEFAULT_VALIDATORS_TEMPLATE)]
        template_file: PathBuf,

        #[arg(long, default_value = DEFAULT_VALIDATORS_OUTPUT)]
        output_file: PathBuf,
    },
}
