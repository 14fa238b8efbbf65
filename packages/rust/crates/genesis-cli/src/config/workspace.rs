//! Work dir resolution.
//!
//! Every path the tool touches (contracts, scripts, genesis output) is
//! relative to the work dir: `--root`, else `PRJ_ROOT`, else the current
//! directory. Running from inside `scripts/` resolves to its parent.

use std::path::{Path, PathBuf};

/// Contracts directory, relative to the work dir.
pub const CONTRACTS_DIR: &str = "contracts";

/// Helper scripts directory, relative to the work dir.
pub const SCRIPTS_DIR: &str = "scripts";

/// Resolve the work dir from an explicit root, `PRJ_ROOT`, or the cwd.
#[must_use]
pub fn resolve_work_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(root) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return root;
    }
    let prj_root = std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    if let Some(root) = prj_root {
        return root;
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    work_dir_from(&cwd)
}

/// Strip a trailing `scripts` component from `dir`.
#[must_use]
pub fn work_dir_from(dir: &Path) -> PathBuf {
    match (dir.file_name(), dir.parent()) {
        (Some(name), Some(parent)) if name == SCRIPTS_DIR => parent.to_path_buf(),
        _ => dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_root_wins() {
        let root = PathBuf::from("/tmp/genesis-contract");
        assert_eq!(resolve_work_dir(Some(root.clone())), root);
    }

    #[test]
    fn test_scripts_dir_resolves_to_parent() {
        assert_eq!(
            work_dir_from(Path::new("/repo/genesis/scripts")),
            PathBuf::from("/repo/genesis")
        );
        assert_eq!(
            work_dir_from(Path::new("/repo/genesis")),
            PathBuf::from("/repo/genesis")
        );
        assert_eq!(
            work_dir_from(Path::new("/repo/myscripts")),
            PathBuf::from("/repo/myscripts")
        );
    }
}
