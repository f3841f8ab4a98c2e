//! Input format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Kind of input a report arrives as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFormat {
    /// PDF document with the given header version (e.g. "1.7")
    Pdf { version: String },
    /// Already-extracted UTF-8 text
    Text,
}

impl InputFormat {
    /// Check if this is a PDF.
    pub fn is_pdf(&self) -> bool {
        matches!(self, InputFormat::Pdf { .. })
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Pdf { version } => write!(f, "PDF {}", version),
            InputFormat::Text => f.write_str("text"),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// How much of a file is inspected.
const SNIFF_LEN: u64 = 4096;

/// Detect the input format from a file path.
///
/// Only the first few kilobytes are read.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let mut head = Vec::new();
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    detect_format_from_bytes(&head)
}

/// Detect the input format from the leading bytes of a file.
///
/// # Returns
/// * `Ok(InputFormat::Pdf)` if the data starts with a valid PDF header
/// * `Ok(InputFormat::Text)` if the data is UTF-8 text
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    if let Some(rest) = data.strip_prefix(PDF_MAGIC) {
        let version = rest
            .get(..VERSION_LEN)
            .map(|v| String::from_utf8_lossy(v).to_string())
            .ok_or(Error::UnknownFormat)?;
        if !is_valid_version(&version) {
            return Err(Error::UnsupportedVersion(version));
        }
        return Ok(InputFormat::Pdf { version });
    }

    if data.is_empty() || looks_like_text(data) {
        Ok(InputFormat::Text)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// UTF-8 check that tolerates a multi-byte character cut off at the end
/// of the sniffed window.
fn looks_like_text(data: &[u8]) -> bool {
    match std::str::from_utf8(data) {
        Ok(text) => !text.contains('\0'),
        Err(e) => e.error_len().is_none() && !data[..e.valid_up_to()].contains(&0),
    }
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if a file is a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok_and(|f| f.is_pdf())
}
