//! Canonical error signatures and their 4-byte selectors.
//!
//! `error InvalidValue(uint256 value, address who);` canonicalizes to
//! `InvalidValue(uint256,address)`; the selector is the first four bytes of
//! Keccak-256 over that string, as in the Solidity ABI.

use std::sync::LazyLock;

use regex::Regex;
use sha3::{Digest, Keccak256};

/// Selector width in bytes.
pub const SELECTOR_LEN: usize = 4;

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{4}error\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*\((.*)\)\s*;\s*$")
        .unwrap_or_else(|err| panic!("invalid DECLARATION regex: {err}"))
});

/// An `error` declaration found on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDeclaration {
    /// Declared error name.
    pub name: String,
    /// Raw text between the parentheses (types and parameter names).
    pub params: String,
}

impl ErrorDeclaration {
    /// Parse a line (without terminator) indented by exactly four whitespace characters.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let caps = DECLARATION.captures(line)?;
        Some(Self {
            name: caps.get(1)?.as_str().to_string(),
            params: caps.get(2)?.as_str().to_string(),
        })
    }

    /// Canonical signature, see [`canonical_signature`].
    #[must_use]
    pub fn canonical_signature(&self) -> Option<String> {
        canonical_signature(&self.name, &self.params)
    }
}

/// Build `Name(type1,type2)` from a raw parameter list.
///
/// Each comma-separated parameter keeps only its first whitespace-delimited
/// token. Returns `None` when a parameter is empty (e.g. `Foo(uint256,)`).
#[must_use]
pub fn canonical_signature(name: &str, params: &str) -> Option<String> {
    if params.trim().is_empty() {
        return Some(format!("{name}()"));
    }
    let types = params
        .split(',')
        .map(|param| param.split_whitespace().next())
        .collect::<Option<Vec<_>>>()?;
    Some(format!("{name}({})", types.join(",")))
}

/// First four bytes of Keccak-256 over the UTF-8 signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; SELECTOR_LEN] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; SELECTOR_LEN];
    out.copy_from_slice(&digest[..SELECTOR_LEN]);
    out
}

/// Selector rendered as `0x` + 8 lowercase hex digits.
#[must_use]
pub fn selector_hex(signature: &str) -> String {
    format!("0x{}", hex::encode(selector(signature)))
}
