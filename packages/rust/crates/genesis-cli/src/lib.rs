//! l2p-genesis - Genesis contract patcher for L2P networks
//!
//! Patches per-network parameters into the genesis system contracts, keeps
//! `.bak` copies for recovery, then runs `forge build` and the genesis
//! generator. Also annotates `error` declarations with their ABI selectors
//! and renders the helper scripts consumed by the generator.
//!
//! # Architecture
//!
//! ```text
//! genesis-cli/src/
//! ├── lib.rs        # Re-exports (this file)
//! ├── error.rs      # GenesisError (thiserror)
//! ├── chain_id.rs   # Decimal -> padded hex
//! ├── profile.rs    # Network, ParameterProfile, ProfileOverrides
//! ├── config/       # genesis.yaml, work dir resolution
//! ├── contracts.rs  # Per-contract patch routines
//! ├── toolchain.rs  # forge / node subprocesses
//! ├── templates.rs  # init_holders.js / validators.js rendering
//! ├── pipeline.rs   # GenesisRunner (run, recover, annotate)
//! ├── cli.rs        # Command line (binary only)
//! └── main.rs       # Binary entry point
//! ```

mod chain_id;
mod config;
mod contracts;
mod error;
mod pipeline;
mod profile;
mod templates;
mod toolchain;

pub use chain_id::{MIN_HEX_WIDTH, encode_chain_id, format_chain_id};
pub use config::{
    CONTRACTS_DIR, DEFAULT_SETTINGS_FILE, GenesisSettings, SCRIPTS_DIR, ToolchainSettings,
    load_genesis_settings, load_settings_for, read_settings, resolve_work_dir, work_dir_from,
};
pub use contracts::{Contract, ContractPatch, PATCH_SEQUENCE, PatchContext, patch_contract};
pub use error::{GenesisError, Result};
pub use pipeline::{GenesisRunner, RecoveryReport, RunOptions, RunReport};
pub use profile::{Network, ParameterProfile, ProfileOverrides, strip_hex_prefix};
pub use templates::{
    DEFAULT_INIT_HOLDERS_OUTPUT, DEFAULT_INIT_HOLDERS_TEMPLATE, DEFAULT_VALIDATORS_CONF,
    DEFAULT_VALIDATORS_OUTPUT, DEFAULT_VALIDATORS_TEMPLATE, TemplateRenderer, ValidatorInfo,
    parse_init_holders, parse_validators,
};
pub use toolchain::{
    DEFAULT_FORGE, DEFAULT_GENESIS_SCRIPT, DEFAULT_NODE, DEFAULT_VALIDATORS_MODULE, Toolchain,
    parse_validator_bytes,
};
