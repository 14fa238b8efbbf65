//! Whole-file text reads and writes for source files.
//!
//! Source files are read completely, edited in memory and written back in one
//! call. Reads refuse binary content and invalid UTF-8 so that a rewrite never
//! mangles bytes it did not understand.

use std::fs;
use std::io::Read;
use std::path::Path;

use memchr::memchr;

use crate::error::IoError;

/// Quick binary detection - checks first 8KB for NULL bytes.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = std::cmp::min(buffer.len(), 8192);
    memchr(0, &buffer[..check_len]).is_some()
}

/// Read a source file as text with size and binary checks.
///
/// # Arguments
/// * `path` - Path to the file
/// * `max_bytes` - Maximum file size in bytes
///
/// # Errors
/// `NotFound` when the file is missing, `TooLarge` over the limit,
/// `BinaryFile` for NULL bytes and `Encoding` for invalid UTF-8.
///
/// # Example
///
/// ```rust,ignore
/// use genesis_io::read_text_safe;
///
/// let content = read_text_safe("contracts/System.sol", 1024 * 1024)?;
/// ```
pub fn read_text_safe<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    let path = path.as_ref();

    let metadata =
        fs::metadata(path).map_err(|_| IoError::NotFound(path.to_string_lossy().to_string()))?;

    if metadata.len() > max_bytes {
        return Err(IoError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = fs::File::open(path)?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or_default());
    file.read_to_end(&mut buffer)?;

    if is_binary(&buffer) {
        return Err(IoError::BinaryFile(path.display().to_string()));
    }

    String::from_utf8(buffer).map_err(|_| IoError::Encoding(path.display().to_string()))
}

/// Replace the whole content of a file.
///
/// # Errors
/// Returns `IoError::System` when the file cannot be written.
pub fn write_text<P: AsRef<Path>>(path: P, content: &str) -> Result<(), IoError> {
    let path = path.as_ref();
    fs::write(path, content)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}
