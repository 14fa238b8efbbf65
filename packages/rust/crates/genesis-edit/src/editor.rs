//! Anchor-based text editor.
//!
//! Insert and replace operations over raw source text. Every operation fails
//! with `AnchorNotFound` instead of silently doing nothing.

use std::path::Path;

use crate::capture::{literal_replacement, normalize_replacement};
use crate::error::EditError;
use crate::locate::{Anchor, line_ending, lines};
use crate::staged::StagedFile;
use crate::types::{EditConfig, EditLocation, EditResult, FilePatch};

/// TextEditor - line-anchored insertions and bounded regex replacements.
///
/// # Example
///
/// ```rust,ignore
/// use genesis_edit::TextEditor;
///
/// let result = TextEditor::replace_parameter(
///     "uint256 public constant FELONY_THRESHOLD = 150;",
///     "uint256 public constant FELONY_THRESHOLD",
///     "300",
/// )?;
/// assert_eq!(result.modified, "uint256 public constant FELONY_THRESHOLD = 300;");
/// ```
pub struct TextEditor;

impl TextEditor {
    /// Insert `text` as a new line directly before the first line matching `pattern`.
    ///
    /// The matched line and every other line are kept as they are. Later
    /// matches are ignored.
    ///
    /// # Errors
    /// `InvalidPattern` for a bad regex, `AnchorNotFound` when no line matches.
    pub fn insert(content: &str, pattern: &str, text: &str) -> Result<EditResult, EditError> {
        Self::insert_at(content, &Anchor::new(pattern)?, text)
    }

    /// [`TextEditor::insert`] with a precompiled anchor.
    ///
    /// # Errors
    /// `AnchorNotFound` when no line matches.
    pub fn insert_at(content: &str, anchor: &Anchor, text: &str) -> Result<EditResult, EditError> {
        let index = anchor
            .find_line(content)
            .ok_or_else(|| EditError::anchor_not_found(anchor.pattern()))?;

        let mut modified = String::with_capacity(content.len() + text.len() + 2);
        for (i, line) in lines(content).enumerate() {
            if i == index {
                modified.push_str(text);
                let ending = line_ending(line);
                modified.push_str(if ending.is_empty() { "\n" } else { ending });
            }
            modified.push_str(line);
        }

        Ok(EditResult {
            original: content.to_string(),
            modified,
            count: 1,
            edits: vec![EditLocation {
                line: index + 1,
                column: 1,
                original_text: String::new(),
                new_text: text.to_string(),
            }],
        })
    }

    /// Replace up to `limit` leftmost non-overlapping matches of `pattern`.
    ///
    /// `limit == 0` replaces every match. The replacement may reference
    /// capture groups (`$1`, `${name}`, `\1`).
    ///
    /// # Errors
    /// `InvalidPattern` for a bad regex, `AnchorNotFound` when nothing matches.
    pub fn replace(
        content: &str,
        pattern: &str,
        replacement: &str,
        limit: usize,
    ) -> Result<EditResult, EditError> {
        Self::replace_at(content, &Anchor::new(pattern)?, replacement, limit)
    }

    /// [`TextEditor::replace`] with a precompiled anchor.
    ///
    /// # Errors
    /// `AnchorNotFound` when nothing matches.
    pub fn replace_at(
        content: &str,
        anchor: &Anchor,
        replacement: &str,
        limit: usize,
    ) -> Result<EditResult, EditError> {
        let template = normalize_replacement(replacement);

        let mut modified = String::with_capacity(content.len());
        let mut edits = Vec::new();
        let mut last_end = 0;

        for caps in anchor.regex().captures_iter(content) {
            if limit != 0 && edits.len() == limit {
                break;
            }
            let Some(m) = caps.get(0) else { continue };

            let mut new_text = String::new();
            caps.expand(&template, &mut new_text);

            modified.push_str(&content[last_end..m.start()]);
            modified.push_str(&new_text);
            last_end = m.end();

            let line = content[..m.start()].matches('\n').count() + 1;
            let last_newline = content[..m.start()].rfind('\n').map_or(0, |i| i + 1);
            edits.push(EditLocation {
                line,
                column: m.start() - last_newline + 1,
                original_text: m.as_str().to_string(),
                new_text,
            });
        }

        if edits.is_empty() {
            return Err(EditError::anchor_not_found(anchor.pattern()));
        }
        modified.push_str(&content[last_end..]);

        Ok(EditResult {
            original: content.to_string(),
            modified,
            count: edits.len(),
            edits,
        })
    }

    /// Pattern matching a `NAME = VALUE;` statement for `name`.
    #[must_use]
    pub fn parameter_pattern(name: &str) -> String {
        format!("{} =[^;]*;", regex::escape(name))
    }

    /// Rewrite the value of the first `name = ...;` statement.
    ///
    /// `name` and `value` are literal text.
    ///
    /// # Errors
    /// `AnchorNotFound` when the statement is absent.
    pub fn replace_parameter(
        content: &str,
        name: &str,
        value: &str,
    ) -> Result<EditResult, EditError> {
        let replacement = format!("{name} = {value};");
        Self::replace(
            content,
            &Self::parameter_pattern(name),
            &literal_replacement(&replacement),
            1,
        )
    }

    /// Insert into a file; the file is written only when the anchor exists.
    ///
    /// # Errors
    /// I/O failures, `InvalidPattern` or `AnchorNotFound` (file untouched).
    pub fn insert_in_file<P: AsRef<Path>>(
        path: P,
        pattern: &str,
        text: &str,
        config: EditConfig,
    ) -> Result<FilePatch, EditError> {
        let mut file = StagedFile::open(path, config)?;
        file.insert(pattern, text)?;
        file.commit()
    }

    /// Replace in a file; the file is written only when the pattern matches.
    ///
    /// # Errors
    /// I/O failures, `InvalidPattern` or `AnchorNotFound` (file untouched).
    pub fn replace_in_file<P: AsRef<Path>>(
        path: P,
        pattern: &str,
        replacement: &str,
        limit: usize,
        config: EditConfig,
    ) -> Result<FilePatch, EditError> {
        let mut file = StagedFile::open(path, config)?;
        file.replace(pattern, replacement, limit)?;
        file.commit()
    }

    /// Rewrite one `name = ...;` statement in a file.
    ///
    /// # Errors
    /// I/O failures or `AnchorNotFound` (file untouched).
    pub fn replace_parameter_in_file<P: AsRef<Path>>(
        path: P,
        name: &str,
        value: &str,
        config: EditConfig,
    ) -> Result<FilePatch, EditError> {
        let mut file = StagedFile::open(path, config)?;
        file.replace_parameter(name, value)?;
        file.commit()
    }
}
