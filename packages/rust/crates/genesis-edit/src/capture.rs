//! Back-reference handling for replacement templates.
//!
//! Replacement templates use `regex` expansion syntax (`$1`, `${name}`, `$$`).
//! The backslash form found in older patch scripts (`\1`, `\g<name>`) is
//! rewritten to the same syntax before expansion.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static BACKSLASH_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:(\d+)|g<(\w+)>)")
        .unwrap_or_else(|err| panic!("invalid BACKSLASH_REFERENCE regex: {err}"))
});

/// Rewrite `\N` and `\g<name>` references into `${N}` / `${name}`.
///
/// Templates without backslash references are returned unchanged.
#[must_use]
pub fn normalize_replacement(template: &str) -> Cow<'_, str> {
    if !template.contains('\\') {
        return Cow::Borrowed(template);
    }
    BACKSLASH_REFERENCE.replace_all(template, |caps: &Captures<'_>| {
        let group = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        format!("${{{group}}}")
    })
}

/// Escape `$` so that `text` is inserted verbatim by regex expansion.
#[must_use]
pub fn literal_replacement(text: &str) -> Cow<'_, str> {
    if text.contains('$') {
        Cow::Owned(text.replace('$', "$$"))
    } else {
        Cow::Borrowed(text)
    }
}
