//! Two-phase editing of a single source file.
//!
//! A [`StagedFile`] reads the file once, applies every insert/replace in
//! memory and writes once on [`StagedFile::commit`]. A missing anchor aborts
//! before anything is written, so a file is either fully patched or untouched.

use std::path::{Path, PathBuf};

use genesis_io::{read_text_safe, write_text};

use crate::diff::generate_file_diff;
use crate::editor::TextEditor;
use crate::error::EditError;
use crate::locate::Anchor;
use crate::types::{EditConfig, EditLocation, EditResult, FilePatch};

/// In-memory working copy of a source file.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    config: EditConfig,
    original: String,
    current: String,
    edits: Vec<EditLocation>,
}

impl StagedFile {
    /// Read `path` into a new staging buffer.
    ///
    /// # Errors
    /// Propagates read failures (`NotFound`, `TooLarge`, `BinaryFile`, ...).
    pub fn open<P: AsRef<Path>>(path: P, config: EditConfig) -> Result<Self, EditError> {
        let path = path.as_ref().to_path_buf();
        let original = read_text_safe(&path, config.max_file_size)?;
        Ok(Self {
            path,
            config,
            current: original.clone(),
            original,
            edits: Vec::new(),
        })
    }

    /// File being edited.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Staged content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.current
    }

    /// Edits staged so far.
    #[must_use]
    pub fn edits(&self) -> &[EditLocation] {
        &self.edits
    }

    /// Stage a line insertion before the first line matching `pattern`.
    ///
    /// # Errors
    /// `InvalidPattern` or `AnchorNotFound` (carrying this file's path).
    pub fn insert(&mut self, pattern: &str, text: &str) -> Result<&mut Self, EditError> {
        let anchor = Anchor::new(pattern)?;
        let result = TextEditor::insert_at(&self.current, &anchor, text)
            .map_err(|e| e.in_file(&self.path))?;
        Ok(self.stage(result))
    }

    /// Stage a bounded replacement (`limit == 0` replaces all matches).
    ///
    /// # Errors
    /// `InvalidPattern` or `AnchorNotFound` (carrying this file's path).
    pub fn replace(
        &mut self,
        pattern: &str,
        replacement: &str,
        limit: usize,
    ) -> Result<&mut Self, EditError> {
        let anchor = Anchor::new(pattern)?;
        let result = TextEditor::replace_at(&self.current, &anchor, replacement, limit)
            .map_err(|e| e.in_file(&self.path))?;
        Ok(self.stage(result))
    }

    /// Stage a `name = value;` rewrite.
    ///
    /// # Errors
    /// `AnchorNotFound` (carrying this file's path).
    pub fn replace_parameter(&mut self, name: &str, value: &str) -> Result<&mut Self, EditError> {
        let result = TextEditor::replace_parameter(&self.current, name, value)
            .map_err(|e| e.in_file(&self.path))?;
        Ok(self.stage(result))
    }

    fn stage(&mut self, result: EditResult) -> &mut Self {
        for edit in &result.edits {
            tracing::debug!(
                path = %self.path.display(),
                line = edit.line,
                new_text = %edit.new_text,
                "staged edit"
            );
        }
        self.current = result.modified;
        self.edits.extend(result.edits);
        self
    }

    /// Unified diff of the staged changes, with file headers.
    #[must_use]
    pub fn diff(&self) -> String {
        generate_file_diff(&self.path, &self.original, &self.current)
    }

    /// Write the staged content (unless dry run or unchanged).
    ///
    /// # Errors
    /// Propagates write failures.
    pub fn commit(self) -> Result<FilePatch, EditError> {
        let changed = self.current != self.original;
        let written = changed && !self.config.dry_run;
        if written {
            write_text(&self.path, &self.current)?;
        }
        Ok(FilePatch {
            diff: if changed { self.diff() } else { String::new() },
            path: self.path,
            count: self.edits.len(),
            written,
        })
    }
}
