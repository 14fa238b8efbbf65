//! Selector annotations above `error` declarations.
//!
//! One forward pass over the lines of a file. Each declaration gets exactly
//! one `// @notice signature: 0x........` line directly above it: an existing
//! annotation there is overwritten, otherwise a new one is inserted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use genesis_io::{IoError, read_text_safe, write_text};
use globset::Glob;
use regex::Regex;
use serde::Serialize;

use crate::error::EditError;
use crate::locate::{line_body, line_ending, lines};
use crate::signature::{ErrorDeclaration, selector_hex};
use crate::types::EditConfig;

/// Literal prefix of an annotation line.
pub const ANNOTATION_PREFIX: &str = "    // @notice signature: ";

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{4}//\s@notice\ssignature:\s.*$")
        .unwrap_or_else(|err| panic!("invalid ANNOTATION regex: {err}"))
});

/// What happened to the annotation of one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationAction {
    /// New annotation line inserted above the declaration.
    Inserted,
    /// Existing annotation overwritten with a different selector.
    Updated,
    /// Existing annotation already carried the right selector.
    Unchanged,
}

/// One annotated declaration.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    /// Line of the declaration in the annotated output (1-indexed).
    pub line: usize,
    /// Canonical signature, e.g. `Foo(uint256,address)`.
    pub signature: String,
    /// `0x`-prefixed selector.
    pub selector: String,
    /// Insert / update / unchanged.
    pub action: AnnotationAction,
}

/// Output of annotating one source text.
#[derive(Debug, Clone)]
pub struct AnnotatedSource {
    /// Annotated content.
    pub content: String,
    /// Declarations found, in file order.
    pub annotations: Vec<Annotation>,
}

impl AnnotatedSource {
    /// Whether any annotation was inserted or updated.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| a.action != AnnotationAction::Unchanged)
    }
}

/// Directory annotation settings.
#[derive(Debug, Clone)]
pub struct AnnotateConfig {
    /// File name glob of eligible sources.
    pub file_glob: String,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Size limit and dry-run switch.
    pub edit: EditConfig,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            file_glob: "*.sol".to_string(),
            recursive: false,
            edit: EditConfig::default(),
        }
    }
}

/// Statistics for a directory annotation run.
#[derive(Debug, Default, Serialize)]
pub struct AnnotateStats {
    /// Number of eligible files scanned
    pub files_scanned: usize,
    /// Number of files whose annotations changed
    pub files_changed: usize,
    /// Declarations found
    pub declarations: usize,
    /// Annotations inserted
    pub inserted: usize,
    /// Annotations overwritten
    pub updated: usize,
    /// Files with changed annotations
    pub modified_files: Vec<String>,
    /// Errors encountered (path -> error message)
    pub errors: BTreeMap<String, String>,
}

/// SignatureAnnotator - writes ABI error selectors above declarations.
pub struct SignatureAnnotator;

impl SignatureAnnotator {
    /// Annotate every declaration in `content`.
    ///
    /// Declarations with a malformed parameter list are logged and skipped.
    #[must_use]
    pub fn annotate(content: &str) -> AnnotatedSource {
        let mut out: Vec<String> = Vec::new();
        let mut annotations = Vec::new();

        for line in lines(content) {
            if let Some(declaration) = ErrorDeclaration::parse(line_body(line)) {
                match declaration.canonical_signature() {
                    Some(signature) => {
                        let selector = selector_hex(&signature);
                        let ending = match line_ending(line) {
                            "" => "\n",
                            ending => ending,
                        };
                        let annotation = format!("{ANNOTATION_PREFIX}{selector}{ending}");

                        let previous = out
                            .last_mut()
                            .filter(|previous| ANNOTATION.is_match(line_body(previous.as_str())));
                        let action = match previous {
                            Some(previous) if *previous == annotation => {
                                AnnotationAction::Unchanged
                            }
                            Some(previous) => {
                                *previous = annotation;
                                AnnotationAction::Updated
                            }
                            None => {
                                out.push(annotation);
                                AnnotationAction::Inserted
                            }
                        };

                        annotations.push(Annotation {
                            line: out.len() + 1,
                            signature,
                            selector,
                            action,
                        });
                    }
                    None => tracing::warn!(
                        declaration = %line_body(line).trim(),
                        "malformed parameter list; declaration not annotated"
                    ),
                }
            }
            out.push(line.to_string());
        }

        AnnotatedSource {
            content: out.concat(),
            annotations,
        }
    }

    /// Annotate a file in place (written only when something changed).
    ///
    /// # Errors
    /// Propagates read and write failures.
    pub fn annotate_file<P: AsRef<Path>>(
        path: P,
        config: EditConfig,
    ) -> Result<AnnotatedSource, EditError> {
        let path = path.as_ref();
        let content = read_text_safe(path, config.max_file_size)?;
        let annotated = Self::annotate(&content);

        if annotated.changed() && !config.dry_run {
            write_text(path, &annotated.content)?;
        }
        for annotation in &annotated.annotations {
            tracing::debug!(
                path = %path.display(),
                signature = %annotation.signature,
                selector = %annotation.selector,
                action = ?annotation.action,
                "annotated error"
            );
        }
        Ok(annotated)
    }

    /// Annotate every eligible file of `dir`, one file at a time.
    ///
    /// Per-file failures are collected in [`AnnotateStats::errors`] and do not
    /// stop the run.
    ///
    /// # Errors
    /// `NotFound` when `dir` is not a directory, `InvalidGlob` for a bad glob.
    pub fn annotate_dir(dir: &Path, config: &AnnotateConfig) -> Result<AnnotateStats, EditError> {
        if !dir.is_dir() {
            return Err(IoError::NotFound(dir.display().to_string()).into());
        }

        let mut stats = AnnotateStats::default();
        for path in eligible_files(dir, config)? {
            stats.files_scanned += 1;
            match Self::annotate_file(&path, config.edit) {
                Ok(annotated) => {
                    stats.declarations += annotated.annotations.len();
                    for annotation in &annotated.annotations {
                        match annotation.action {
                            AnnotationAction::Inserted => stats.inserted += 1,
                            AnnotationAction::Updated => stats.updated += 1,
                            AnnotationAction::Unchanged => {}
                        }
                    }
                    if annotated.changed() {
                        stats.files_changed += 1;
                        stats.modified_files.push(path.display().to_string());
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "annotation failed");
                    stats
                        .errors
                        .insert(path.display().to_string(), format!("Edit error: {e}"));
                }
            }
        }

        tracing::info!(
            dir = %dir.display(),
            files = stats.files_scanned,
            changed = stats.files_changed,
            declarations = stats.declarations,
            "error signatures annotated"
        );
        Ok(stats)
    }
}

/// Sorted list of files under `dir` whose name matches the configured glob.
fn eligible_files(dir: &Path, config: &AnnotateConfig) -> Result<Vec<PathBuf>, EditError> {
    let matcher = Glob::new(&config.file_glob)
        .map_err(|source| EditError::InvalidGlob {
            glob: config.file_glob.clone(),
            source,
        })?
        .compile_matcher();

    // Every matching source is annotated, hidden or ignore-listed alike.
    let mut files: Vec<PathBuf> = ignore::WalkBuilder::new(dir)
        .max_depth(if config.recursive { None } else { Some(1) })
        .standard_filters(false)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| path.file_name().is_some_and(|name| matcher.is_match(name)))
        .collect();
    files.sort();
    Ok(files)
}
