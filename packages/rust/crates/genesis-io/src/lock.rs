//! Cross-process lock for a patch workspace.
//!
//! Patch runs and recovery both rewrite sources and backups in the same
//! directory, so only one of them may run per workspace at a time. The lock
//! is an exclusive advisory `flock` on `<dir>/.l2p-genesis.lock`, held for the
//! lifetime of [`WorkspaceLock`]. The lock file is never removed, so every
//! contender locks the same inode.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::IoError;

/// File name of the lock inside the workspace directory.
pub const LOCK_FILE_NAME: &str = ".l2p-genesis.lock";

/// Held exclusive lock; released on drop.
#[derive(Debug)]
pub struct WorkspaceLock {
    file: File,
    path: PathBuf,
}

impl WorkspaceLock {
    /// Try to take the lock for `dir` without blocking.
    ///
    /// # Errors
    /// `Locked` when another process holds it, `System` when the lock file
    /// cannot be created.
    pub fn acquire(dir: &Path) -> Result<Self, IoError> {
        let path = dir.join(LOCK_FILE_NAME);
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        if FileExt::try_lock_exclusive(&file).is_err() {
            return Err(IoError::Locked(path));
        }

        // Diagnostics only; a failed write does not invalidate the lock.
        let _ = file.set_len(0);
        let _ = writeln!(file, "{}", std::process::id());

        tracing::debug!(path = %path.display(), "acquired workspace lock");
        Ok(Self { file, path })
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        tracing::debug!(path = %self.path.display(), "released workspace lock");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let dir = TempDir::new().unwrap();
        let first = WorkspaceLock::acquire(dir.path()).unwrap();
        assert!(first.path().exists());

        let second = WorkspaceLock::acquire(dir.path());
        assert!(matches!(second, Err(IoError::Locked(_))));

        drop(first);
        assert!(dir.path().join(LOCK_FILE_NAME).exists());
        assert!(WorkspaceLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn test_handle_opened_before_release_still_excludes() {
        let dir = TempDir::new().unwrap();
        let first = WorkspaceLock::acquire(dir.path()).unwrap();
        let waiter = File::open(dir.path().join(LOCK_FILE_NAME)).unwrap();

        drop(first);
        let second = WorkspaceLock::acquire(dir.path()).unwrap();

        // The waiter shares the inode with the live lock, so it cannot win too.
        assert!(FileExt::try_lock_exclusive(&waiter).is_err());
        drop(second);
        assert!(FileExt::try_lock_exclusive(&waiter).is_ok());
    }
}
