//! Shadow copies of source files for manual recovery.
//!
//! A backup lives next to its source with the extension swapped
//! (`StakeHub.sol` -> `StakeHub.bak`). Backups are only ever written by
//! [`BackupStore::backup`] and only ever consumed by [`BackupStore::recover`];
//! edits always target the live source file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IoError;

/// Default extension of managed source files.
pub const DEFAULT_SOURCE_EXTENSION: &str = "sol";
/// Default extension of backup files.
pub const DEFAULT_BACKUP_EXTENSION: &str = "bak";

/// Per-directory backup store.
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
    source_extension: String,
    backup_extension: String,
}

/// Outcome of a [`BackupStore::recover`] call.
#[derive(Debug, Default, Clone)]
pub struct RecoverReport {
    /// Source files restored from their backups, in directory order.
    pub restored: Vec<PathBuf>,
}

impl BackupStore {
    /// Create a store managing `dir` with the default `.sol` / `.bak` pair.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            backup_extension: DEFAULT_BACKUP_EXTENSION.to_string(),
        }
    }

    /// Override the source and backup extensions (without leading dot).
    #[must_use]
    pub fn with_extensions(mut self, source: &str, backup: &str) -> Self {
        self.source_extension = source.trim_start_matches('.').to_string();
        self.backup_extension = backup.trim_start_matches('.').to_string();
        self
    }

    /// Managed directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Extension of managed sources (without leading dot).
    #[must_use]
    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    /// Backup path for a source file.
    #[must_use]
    pub fn backup_path(&self, source: &Path) -> PathBuf {
        source.with_extension(&self.backup_extension)
    }

    /// Copy the current bytes of `source` to its backup path.
    ///
    /// An existing backup is overwritten. Recovery then restores this newer
    /// state, not whatever the older backup held.
    ///
    /// # Errors
    /// `NotFound` when the source is missing, `System` when the copy fails.
    pub fn backup(&self, source: &Path) -> Result<PathBuf, IoError> {
        if !source.is_file() {
            return Err(IoError::NotFound(source.display().to_string()));
        }
        let destination = self.backup_path(source);
        if destination.exists() {
            tracing::warn!(
                source = %source.display(),
                backup = %destination.display(),
                "backup already exists and will be overwritten; run recover first to keep the pristine copy"
            );
        }
        fs::copy(source, &destination)?;
        tracing::debug!(source = %source.display(), backup = %destination.display(), "backed up");
        Ok(destination)
    }

    /// Like [`BackupStore::backup`] but never fails the caller.
    ///
    /// Problems are logged and `None` is returned; callers keep patching the
    /// unguarded original.
    pub fn backup_or_warn(&self, source: &Path) -> Option<PathBuf> {
        match self.backup(source) {
            Ok(path) => Some(path),
            Err(error) => {
                tracing::warn!(
                    source = %source.display(),
                    error = %error,
                    "backup failed; continuing without a recovery copy"
                );
                None
            }
        }
    }

    /// All backups currently present in the managed directory, sorted.
    ///
    /// # Errors
    /// Returns `System` when the directory cannot be listed.
    pub fn list(&self) -> Result<Vec<PathBuf>, IoError> {
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_backup = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy() == self.backup_extension);
            if is_backup && path.is_file() {
                backups.push(path);
            }
        }
        backups.sort();
        Ok(backups)
    }

    /// Move every backup back over its source file.
    ///
    /// No-op when there are no backups. After success no backup remains.
    ///
    /// # Errors
    /// Returns `System` on the first listing or rename failure; backups
    /// restored before the failure stay restored.
    pub fn recover(&self) -> Result<RecoverReport, IoError> {
        let mut report = RecoverReport::default();
        for backup in self.list()? {
            let original = backup.with_extension(&self.source_extension);
            fs::rename(&backup, &original)?;
            tracing::info!(file = %original.display(), "restored from backup");
            report.restored.push(original);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_swaps_extension() {
        let store = BackupStore::new("/contracts");
        assert_eq!(
            store.backup_path(Path::new("/contracts/StakeHub.sol")),
            PathBuf::from("/contracts/StakeHub.bak")
        );
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        let store = BackupStore::new(dir.path()).with_extensions(".vy", ".orig");
        let source = dir.path().join("Token.vy");
        fs::write(&source, "x").unwrap();

        let backup = store.backup(&source).unwrap();
        assert_eq!(backup, dir.path().join("Token.orig"));
        assert_eq!(store.list().unwrap(), vec![backup]);
    }

    #[test]
    fn test_backup_missing_source() {
        let dir = TempDir::new().unwrap();
        let store = BackupStore::new(dir.path());
        let missing = dir.path().join("Missing.sol");
        assert!(matches!(store.backup(&missing), Err(IoError::NotFound(_))));
        assert!(store.backup_or_warn(&missing).is_none());
    }
}
