//! Chain id rendering for `System.sol`.

/// Minimum width of an encoded chain id.
pub const MIN_HEX_WIDTH: usize = 4;

/// Lowercase hex, no `0x`, left-padded with zeros to at least four digits.
///
/// Longer ids keep their natural width.
#[must_use]
pub fn format_chain_id(chain_id: u64) -> String {
    format!("{chain_id:0width$x}", width = MIN_HEX_WIDTH)
}

/// Parse a decimal chain id and encode it.
///
/// Non-fatal entry point for raw text such as environment values or script
/// arguments; typed ids from flags and settings go through [`format_chain_id`].
/// Non-numeric input is logged and yields `None`.
#[must_use]
pub fn encode_chain_id(raw: &str) -> Option<String> {
    match raw.trim().parse::<u64>() {
        Ok(chain_id) => Some(format_chain_id(chain_id)),
        Err(error) => {
            tracing::error!(input = raw, error = %error, "failed to convert chain id to hex");
            None
        }
    }
}
