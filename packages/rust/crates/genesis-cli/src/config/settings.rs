use std::path::{Path, PathBuf};

use genesis_edit::EditConfig;
use serde::Deserialize;

use crate::error::{GenesisError, Result};
use crate::profile::{Network, ProfileOverrides};

/// Settings file looked up in the work dir when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "genesis.yaml";

/// `genesis.yaml` schema. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenesisSettings {
    /// Contracts directory relative to the work dir.
    pub contracts_dir: Option<String>,
    /// Extension of patched sources (default `sol`).
    pub source_extension: Option<String>,
    /// Extension of backups (default `bak`).
    pub backup_extension: Option<String>,
    /// Refuse to edit files larger than this many bytes.
    pub max_file_size: Option<u64>,
    /// External tool locations.
    pub toolchain: ToolchainSettings,
    /// Mainnet overrides.
    pub mainnet: ProfileOverrides,
    /// Testnet overrides.
    pub testnet: ProfileOverrides,
    /// Dev overrides.
    pub dev: ProfileOverrides,
}

/// External tool locations (programs resolved through `PATH` unless absolute).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Contract compiler (default `forge`).
    pub forge: Option<String>,
    /// Node.js binary (default `node`).
    pub node: Option<String>,
    /// Genesis generator script (default `scripts/generate-genesis.js`).
    pub genesis_script: Option<String>,
    /// Module exporting `validatorSetBytes` (default `./scripts/validators.js`).
    pub validators_module: Option<String>,
}

impl GenesisSettings {
    /// Overrides configured for `network`.
    #[must_use]
    pub fn overrides_for(&self, network: Network) -> ProfileOverrides {
        match network {
            Network::Mainnet => self.mainnet.clone(),
            Network::Testnet => self.testnet.clone(),
            Network::Dev => self.dev.clone(),
        }
    }

    /// Edit limits, with `dry_run` supplied by the caller.
    #[must_use]
    pub fn edit_config(&self, dry_run: bool) -> EditConfig {
        let defaults = EditConfig::default();
        EditConfig {
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
            dry_run,
        }
    }
}

/// Load settings from `explicit`, else `<work_dir>/genesis.yaml`.
///
/// The default file is optional and a broken one only warns. A file named
/// with `--config` must exist and parse.
///
/// # Errors
/// `Settings` when `explicit` cannot be read or parsed.
pub fn load_settings_for(work_dir: &Path, explicit: Option<&Path>) -> Result<GenesisSettings> {
    match explicit {
        Some(path) => read_settings(&absolutize(work_dir, path)),
        None => Ok(load_genesis_settings(&work_dir.join(DEFAULT_SETTINGS_FILE))),
    }
}

/// Load one settings file. Missing, unreadable, or malformed files yield
/// defaults (the latter two with a warning).
#[must_use]
pub fn load_genesis_settings(path: &Path) -> GenesisSettings {
    if !path.exists() {
        return GenesisSettings::default();
    }
    match read_settings(path) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(error = %error, "ignoring settings file");
            GenesisSettings::default()
        }
    }
}

/// Read and parse one settings file.
///
/// # Errors
/// `Settings` on read failure or invalid YAML, including unknown override keys.
pub fn read_settings(path: &Path) -> Result<GenesisSettings> {
    let invalid = |message: String| GenesisError::Settings {
        path: path.to_path_buf(),
        message,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let value = serde_yaml::from_str::<GenesisSettings>(&raw).map_err(|e| invalid(e.to_string()))?;
    tracing::debug!(path = %path.display(), "loaded genesis settings");
    Ok(value)
}

fn absolutize(work_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        work_dir.join(path)
    }
}
