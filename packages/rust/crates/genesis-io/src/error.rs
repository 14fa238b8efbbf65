//! Error types for source file I/O.
//!
//! Library crates use `thiserror` for explicit error enums.

use std::path::PathBuf;

use thiserror::Error;

/// Error types for file I/O operations.
///
/// Each variant represents a specific failure mode when reading, writing,
/// backing up or locking source files.
#[derive(Error, Debug)]
pub enum IoError {
    /// File does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NULL bytes detected).
    #[error("Binary file detected: {0}")]
    BinaryFile(String),

    /// File content is not valid UTF-8.
    #[error("UTF-8 decoding error: {0}")]
    Encoding(String),

    /// Another process holds the workspace lock.
    #[error("Workspace is locked by another process: {}", .0.display())]
    Locked(PathBuf),

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),
}
