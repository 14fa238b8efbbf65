#![allow(clippy::doc_markdown)]

//! genesis-edit - Anchor-based source patching for the L2P genesis contracts
//!
//! Text-level (not AST-level) modification of Solidity sources: every edit is
//! located by a regular expression and fails loudly when its anchor is gone.
//!
//! # Features
//!
//! - **Insert**: New line before the first line matching an anchor
//! - **Replace**: Bounded regex replacement with back-references
//! - **Parameters**: `NAME = VALUE;` rewrites for constants and assignments
//! - **Staging**: All edits of a file validated in memory, then one write
//! - **Diff Preview**: Unified diffs for dry runs
//! - **Selectors**: `// @notice signature: 0x...` annotations for `error` declarations
//!
//! # Architecture
//!
//! ```text
//! genesis-edit/src/
//! ├── lib.rs        # Re-exports (this file)
//! ├── error.rs      # EditError enum (thiserror)
//! ├── types.rs      # EditResult, EditLocation, FilePatch, EditConfig
//! ├── locate.rs     # Anchor (first matching line)
//! ├── capture.rs    # Back-reference normalization
//! ├── editor.rs     # TextEditor insert / replace
//! ├── staged.rs     # StagedFile two-phase edits
//! ├── diff.rs       # Diff generation utilities
//! ├── signature.rs  # Canonical signatures & Keccak selectors
//! └── annotate.rs   # SignatureAnnotator
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use genesis_edit::{EditConfig, StagedFile, SignatureAnnotator, AnnotateConfig};
//!
//! let mut file = StagedFile::open("contracts/SlashIndicator.sol", EditConfig::default())?;
//! file.replace_parameter("uint256 public constant FELONY_THRESHOLD", "150")?
//!     .insert("alreadyInit = true;", "\t\tenableMaliciousVoteSlash = true;")?;
//! file.commit()?;
//!
//! let stats = SignatureAnnotator::annotate_dir("contracts".as_ref(), &AnnotateConfig::default())?;
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod annotate;
mod capture;
mod diff;
mod editor;
mod error;
mod locate;
mod signature;
mod staged;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use editor::TextEditor;
pub use error::EditError;
pub use locate::Anchor;
pub use staged::StagedFile;
pub use types::{EditConfig, EditLocation, EditResult, FilePatch};

// Signature annotation exports
pub use annotate::{
    ANNOTATION_PREFIX, AnnotateConfig, AnnotateStats, AnnotatedSource, Annotation,
    AnnotationAction, SignatureAnnotator,
};
pub use signature::{ErrorDeclaration, SELECTOR_LEN, canonical_signature, selector, selector_hex};

// Re-export template and diff utilities for external use
pub use capture::{literal_replacement, normalize_replacement};
pub use diff::{generate_file_diff, generate_unified_diff};
