//! Error types for genesis generation runs.

use genesis_edit::EditError;
use genesis_io::IoError;
use thiserror::Error;

/// Run-level errors.
///
/// Anchor and subprocess failures are fatal for a run; backup problems never
/// reach this type (they are logged where they happen).
#[derive(Error, Debug)]
pub enum GenesisError {
    /// Patch failure, including `AnchorNotFound`.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// File system failure (lock contention, recovery, template output).
    #[error(transparent)]
    Io(#[from] IoError),

    /// External tool could not be started.
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// External tool exited unsuccessfully.
    #[error("`{command}` failed with {}", exit_label(*.code))]
    Subprocess {
        /// Command line that failed.
        command: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// Validator set bytes could not be obtained.
    #[error("Validator set bytes unavailable: {0}")]
    ValidatorSet(String),

    /// Malformed line in a validators config file.
    #[error("Invalid validator info on line {line}: {content}")]
    InvalidValidator {
        /// 1-indexed line number.
        line: usize,
        /// Offending line.
        content: String,
    },

    /// Explicitly requested settings file could not be read or parsed.
    #[error("Invalid settings file {}: {message}", path.display())]
    Settings {
        /// Settings file path.
        path: std::path::PathBuf,
        /// Read or parse failure.
        message: String,
    },

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

fn exit_label(code: Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("exit code {c}"))
}

impl GenesisError {
    /// True when a patch anchor was missing.
    #[must_use]
    pub fn is_anchor_not_found(&self) -> bool {
        matches!(self, Self::Edit(e) if e.is_anchor_not_found())
    }
}

/// Result type for genesis operations.
pub type Result<T> = std::result::Result<T, GenesisError>;
