//! External collaborators: the contract compiler and the genesis generator.
//!
//! Both are opaque subprocesses run in the work dir; only their exit status
//! matters. A non-zero exit is fatal to the run.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::ToolchainSettings;
use crate::error::{GenesisError, Result};
use crate::profile::strip_hex_prefix;

/// Default compiler binary.
pub const DEFAULT_FORGE: &str = "forge";
/// Default Node.js binary.
pub const DEFAULT_NODE: &str = "node";
/// Default genesis generator, relative to the work dir.
pub const DEFAULT_GENESIS_SCRIPT: &str = "scripts/generate-genesis.js";
/// Default module exporting `validatorSetBytes`.
pub const DEFAULT_VALIDATORS_MODULE: &str = "./scripts/validators.js";

/// Subprocess runner bound to a work dir.
#[derive(Debug, Clone)]
pub struct Toolchain {
    work_dir: PathBuf,
    forge: String,
    node: String,
    genesis_script: String,
    validators_module: String,
}

impl Toolchain {
    /// Toolchain with default program names.
    pub fn new<P: Into<PathBuf>>(work_dir: P) -> Self {
        Self::from_settings(work_dir, &ToolchainSettings::default())
    }

    /// Toolchain with program names taken from settings where present.
    pub fn from_settings<P: Into<PathBuf>>(work_dir: P, settings: &ToolchainSettings) -> Self {
        Self {
            work_dir: work_dir.into(),
            forge: settings.forge.clone().unwrap_or_else(|| DEFAULT_FORGE.to_string()),
            node: settings.node.clone().unwrap_or_else(|| DEFAULT_NODE.to_string()),
            genesis_script: settings
                .genesis_script
                .clone()
                .unwrap_or_else(|| DEFAULT_GENESIS_SCRIPT.to_string()),
            validators_module: settings
                .validators_module
                .clone()
                .unwrap_or_else(|| DEFAULT_VALIDATORS_MODULE.to_string()),
        }
    }

    /// Work dir the subprocesses run in.
    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// `forge build`.
    ///
    /// # Errors
    /// `Spawn` if forge cannot start, `Subprocess` on non-zero exit.
    pub fn forge_build(&self) -> Result<()> {
        let mut command = Command::new(&self.forge);
        command.arg("build");
        self.run(command)
    }

    /// `node scripts/generate-genesis.js --chainId <id> [--ensRegistryOwner <addr>] --output <file>`.
    ///
    /// # Errors
    /// `Spawn` if node cannot start, `Subprocess` on non-zero exit.
    pub fn generate_genesis(
        &self,
        chain_id: u64,
        ens_registry_owner: Option<&str>,
        output: &str,
    ) -> Result<()> {
        let mut command = Command::new(&self.node);
        command
            .arg(&self.genesis_script)
            .arg("--chainId")
            .arg(chain_id.to_string());
        if let Some(owner) = ens_registry_owner {
            command.arg("--ensRegistryOwner").arg(owner);
        }
        command.arg("--output").arg(output);
        self.run(command)
    }

    /// Ask the validators module for the RLP-encoded validator set.
    ///
    /// # Errors
    /// `Spawn` / `Subprocess` for node failures, `ValidatorSet` when the
    /// output is not a hex string.
    pub fn validator_set_bytes(&self) -> Result<String> {
        let script = format!(
            "const exportsObj = require('{}'); console.log(exportsObj.validatorSetBytes.toString('hex'));",
            self.validators_module
        );
        let mut command = Command::new(&self.node);
        command.arg("-e").arg(script);
        let stdout = self.capture(command)?;
        parse_validator_bytes(&stdout)
    }

    fn run(&self, mut command: Command) -> Result<()> {
        let label = describe(&command);
        tracing::info!(command = %label, cwd = %self.work_dir.display(), "running");
        let status = command
            .current_dir(&self.work_dir)
            .status()
            .map_err(|source| GenesisError::Spawn {
                command: label.clone(),
                source,
            })?;
        if !status.success() {
            return Err(GenesisError::Subprocess {
                command: label,
                code: status.code(),
            });
        }
        Ok(())
    }

    fn capture(&self, mut command: Command) -> Result<String> {
        let label = describe(&command);
        tracing::debug!(command = %label, cwd = %self.work_dir.display(), "capturing");
        let output = command
            .current_dir(&self.work_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| GenesisError::Spawn {
                command: label.clone(),
                source,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(command = %label, stderr = %stderr.trim(), "subprocess failed");
            return Err(GenesisError::Subprocess {
                command: label,
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Trim node output and drop the `0x` prefix.
///
/// # Errors
/// `ValidatorSet` when the result is empty or not hex.
pub fn parse_validator_bytes(stdout: &str) -> Result<String> {
    let bytes = strip_hex_prefix(stdout.trim());
    if bytes.is_empty() {
        return Err(GenesisError::ValidatorSet("empty output".to_string()));
    }
    if !bytes.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(GenesisError::ValidatorSet(format!(
            "not a hex string: {}",
            bytes.chars().take(64).collect::<String>()
        )));
    }
    Ok(bytes.to_string())
}

fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validator_bytes() {
        assert_eq!(
            parse_validator_bytes("0xf901a880\n").expect("Should parse"),
            "f901a880"
        );
        assert_eq!(parse_validator_bytes("  abcdef  ").expect("Should parse"), "abcdef");
    }

    #[test]
    fn test_parse_validator_bytes_rejects_garbage() {
        assert!(parse_validator_bytes("").is_err());
        assert!(parse_validator_bytes("0x").is_err());
        assert!(parse_validator_bytes("undefined").is_err());
    }

    #[test]
    fn test_parse_validator_bytes_truncates_on_char_boundary() {
        let stdout = format!("{}é trailing", "x".repeat(63));
        let err = parse_validator_bytes(&stdout).expect_err("Should reject");
        match err {
            GenesisError::ValidatorSet(message) => {
                assert!(message.ends_with(&format!("{}é", "x".repeat(63))));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_describe_command_line() {
        let mut command = Command::new("node");
        command.args(["scripts/generate-genesis.js", "--chainId", "97"]);
        assert_eq!(describe(&command), "node scripts/generate-genesis.js --chainId 97");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_fatal() {
        let toolchain = Toolchain::from_settings(
            std::env::temp_dir(),
            &ToolchainSettings {
                forge: Some("false".to_string()),
                ..ToolchainSettings::default()
            },
        );
        let err = toolchain.forge_build().expect_err("Should fail");
        assert!(matches!(err, GenesisError::Subprocess { code: Some(1), .. }));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let toolchain = Toolchain::from_settings(
            std::env::temp_dir(),
            &ToolchainSettings {
                forge: Some("l2p-genesis-no-such-forge".to_string()),
                ..ToolchainSettings::default()
            },
        );
        let err = toolchain.forge_build().expect_err("Should fail");
        assert!(matches!(err, GenesisError::Spawn { .. }));
    }
}
