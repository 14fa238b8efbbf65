//! Error types for source patching operations.
//!
//! Library crates use `thiserror` for explicit error enums.

use std::path::Path;

use genesis_io::IoError;
use thiserror::Error;

/// Error types for edit operations.
///
/// Each variant represents a specific failure mode in the patching pipeline.
#[derive(Error, Debug)]
pub enum EditError {
    /// File I/O error (reading or writing a source file).
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// Pattern is not a valid regular expression.
    #[error("Pattern error: `{pattern}`: {source}")]
    InvalidPattern {
        /// Pattern as given by the caller.
        pattern: String,
        /// Compiler error from `regex`.
        source: regex::Error,
    },

    /// File name glob is invalid.
    #[error("Glob error: `{glob}`: {source}")]
    InvalidGlob {
        /// Glob as given by the caller.
        glob: String,
        /// Parser error from `globset`.
        source: globset::Error,
    },

    /// No line (insert) or no text (replace) matched the anchor pattern.
    #[error("Anchor not found: `{pattern}` in {location}")]
    AnchorNotFound {
        /// Pattern that found nothing.
        pattern: String,
        /// File path, or `<input>` for in-memory content.
        location: String,
    },
}

/// Location used for anchors searched in plain strings.
pub(crate) const IN_MEMORY: &str = "<input>";

impl EditError {
    pub(crate) fn anchor_not_found(pattern: &str) -> Self {
        Self::AnchorNotFound {
            pattern: pattern.to_string(),
            location: IN_MEMORY.to_string(),
        }
    }

    /// Attach a file path to an in-memory anchor failure.
    #[must_use]
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            Self::AnchorNotFound { pattern, .. } => Self::AnchorNotFound {
                pattern,
                location: path.display().to_string(),
            },
            other => other,
        }
    }

    /// True for the anchor-not-found failure kind.
    #[must_use]
    pub fn is_anchor_not_found(&self) -> bool {
        matches!(self, Self::AnchorNotFound { .. })
    }
}
