//! Pattern locator: first-match search over lines.

use regex::Regex;

use crate::error::EditError;

/// A compiled anchor pattern.
///
/// Matching is line-scoped: the pattern sees one line at a time without its
/// terminator, so `$` means end of line and `.` never crosses a newline.
#[derive(Debug, Clone)]
pub struct Anchor {
    pattern: String,
    regex: Regex,
}

impl Anchor {
    /// Compile an anchor pattern.
    ///
    /// # Errors
    /// Returns `EditError::InvalidPattern` for invalid regex syntax.
    pub fn new(pattern: &str) -> Result<Self, EditError> {
        let regex = Regex::new(pattern).map_err(|source| EditError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Pattern source text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Compiled regex, for whole-text operations.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether a single line (terminator already stripped or not) matches.
    #[must_use]
    pub fn matches_line(&self, line: &str) -> bool {
        self.regex.is_match(line_body(line))
    }

    /// Index (0-based) of the first matching line, or `None`.
    #[must_use]
    pub fn find_line(&self, content: &str) -> Option<usize> {
        lines(content).position(|line| self.matches_line(line))
    }
}

/// Lines of `content` including their terminators.
pub(crate) fn lines(content: &str) -> std::str::SplitInclusive<'_, char> {
    content.split_inclusive('\n')
}

/// A line without its `\n` / `\r\n` terminator.
pub(crate) fn line_body(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |l| l.strip_suffix('\r').unwrap_or(l))
}

/// Terminator of `line` (`"\r\n"`, `"\n"`, or `""` for a final unterminated line).
pub(crate) fn line_ending(line: &str) -> &str {
    &line[line_body(line).len()..]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "contract SystemReward {\n    numOperator = 2;\n    numOperator = 2;\n}\n";

    #[test]
    fn test_first_match_only() {
        let anchor = Anchor::new(r"numOperator = 2;").unwrap();
        assert_eq!(anchor.find_line(SOURCE), Some(1));
    }

    #[test]
    fn test_not_found() {
        let anchor = Anchor::new(r"alreadyInit = true;").unwrap();
        assert_eq!(anchor.find_line(SOURCE), None);
    }

    #[test]
    fn test_line_scoped_end_anchor() {
        let anchor = Anchor::new(r"\{$").unwrap();
        assert_eq!(anchor.find_line("a\r\ncontract X {\r\n}"), Some(1));
    }

    #[test]
    fn test_case_sensitive() {
        let anchor = Anchor::new("NUMOPERATOR").unwrap();
        assert_eq!(anchor.find_line(SOURCE), None);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            Anchor::new(r"__Protectable_init_unchained\("),
            Err(EditError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_line_helpers() {
        assert_eq!(line_body("abc\r\n"), "abc");
        assert_eq!(line_ending("abc\r\n"), "\r\n");
        assert_eq!(line_ending("abc\n"), "\n");
        assert_eq!(line_ending("abc"), "");
    }
}
