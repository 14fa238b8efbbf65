//! Core types for source patching.
//!
//! Defines the data structures used throughout the editing pipeline.

use std::path::PathBuf;

use serde::Serialize;

/// Result of an insert or replace operation.
///
/// Contains both the modified content and metadata about the changes made.
#[derive(Debug, Clone, Serialize)]
pub struct EditResult {
    /// Original content before modification.
    pub original: String,
    /// Modified content after the edit.
    pub modified: String,
    /// Number of insertions or replacements made.
    pub count: usize,
    /// Individual edit locations.
    pub edits: Vec<EditLocation>,
}

/// Location of an individual edit within a file.
#[derive(Debug, Clone, Serialize)]
pub struct EditLocation {
    /// Line number (1-indexed) in the original content.
    pub line: usize,
    /// Column number (1-indexed, in bytes).
    pub column: usize,
    /// Original text that was replaced (empty for insertions).
    pub original_text: String,
    /// New text after the edit.
    pub new_text: String,
}

/// Summary of all edits committed to one file.
#[derive(Debug, Clone, Serialize)]
pub struct FilePatch {
    /// Patched file.
    pub path: PathBuf,
    /// Total insertions and replacements applied.
    pub count: usize,
    /// Unified diff between the content read and the content committed.
    pub diff: String,
    /// Whether the file was rewritten (false for dry runs and no-op edits).
    pub written: bool,
}

/// Configuration for file edit operations.
#[derive(Debug, Clone, Copy)]
pub struct EditConfig {
    /// Maximum file size in bytes (default 1MB).
    pub max_file_size: u64,
    /// Compute edits and diffs without writing anything.
    pub dry_run: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024, // 1MB
            dry_run: false,
        }
    }
}
