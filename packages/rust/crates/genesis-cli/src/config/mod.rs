//! Config namespace: `genesis.yaml` settings and work dir resolution.

mod settings;
mod workspace;

pub use settings::{
    DEFAULT_SETTINGS_FILE, GenesisSettings, ToolchainSettings, load_genesis_settings,
    load_settings_for, read_settings,
};
pub use workspace::{CONTRACTS_DIR, SCRIPTS_DIR, resolve_work_dir, work_dir_from};
