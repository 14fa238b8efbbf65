//! Diff generation for dry runs and reports.
//!
//! Standard unified diffs (`@@` hunks, 3 lines of context) via `similar`.

use std::path::Path;

use similar::TextDiff;

const CONTEXT_RADIUS: usize = 3;

/// Generate a unified diff between two strings without file headers.
///
/// Returns an empty string when both sides are identical.
#[must_use]
pub fn generate_unified_diff(original: &str, modified: &str) -> String {
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .to_string()
}

/// Generate a unified diff with `a/<path>` / `b/<path>` headers.
#[must_use]
pub fn generate_file_diff(path: &Path, original: &str, modified: &str) -> String {
    let label = path.display().to_string();
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string()
}
