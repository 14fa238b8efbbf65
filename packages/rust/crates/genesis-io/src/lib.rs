#![allow(clippy::doc_markdown)]

//! genesis-io - Source file I/O for the L2P genesis patcher
//!
//! Everything that touches the disk on behalf of the patch engine.
//!
//! # Features
//!
//! - **Safe reads**: Binary detection, UTF-8 validation & size limits
//! - **Backups**: `X.sol` -> `X.bak` shadow copies and bulk recovery
//! - **Workspace lock**: One patch run or recovery per checkout at a time
//!
//! # Architecture
//!
//! ```text
//! genesis-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # IoError enum
//! ├── text.rs     # Whole-file read/write
//! ├── backup.rs   # BackupStore (backup / recover)
//! └── lock.rs     # WorkspaceLock (fs2 advisory lock)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use genesis_io::{BackupStore, WorkspaceLock, read_text_safe};
//!
//! let _lock = WorkspaceLock::acquire(work_dir)?;
//! let store = BackupStore::new(work_dir.join("contracts"));
//! store.backup_or_warn(&work_dir.join("contracts/System.sol"));
//! let report = store.recover()?;
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod backup;
mod error;
mod lock;
mod text;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use backup::{BackupStore, DEFAULT_BACKUP_EXTENSION, DEFAULT_SOURCE_EXTENSION, RecoverReport};
pub use error::IoError;
pub use lock::{LOCK_FILE_NAME, WorkspaceLock};
pub use text::{is_binary, read_text_safe, write_text};
