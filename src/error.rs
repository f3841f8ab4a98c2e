//! Error types for labscan library.

use std::io;
use thiserror::Error;

use crate::model::LineShape;

/// Result type alias for labscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting measurements.
///
/// Lines that match no recognizer are not errors, and neither is a document
/// that yields no measurements. Both are normal return values.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is neither a PDF nor readable text.
    #[error("Unknown file format: not a PDF or UTF-8 text")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error extracting the text layer from a PDF.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// The input file exceeds the configured size limit.
    #[error("File is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge {
        /// Actual file size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// A recognizer matched a line but one of its captures is not a number.
    ///
    /// This means the pattern and the report grammar disagree, so the
    /// line is reported instead of being coerced to a default.
    #[error("{shape} line has malformed {field} {raw:?}: {line:?}")]
    Classification {
        /// Recognizer that matched
        shape: LineShape,
        /// Captured field that failed to convert
        field: &'static str,
        /// Raw captured text
        raw: String,
        /// The full source line
        line: String,
    },

    /// A grammar produced a pattern that does not compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Grammar configuration is unusable (e.g. empty unit vocabulary).
    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build a classification error for a capture that failed to parse.
    pub(crate) fn classification(
        shape: LineShape,
        field: &'static str,
        raw: impl Into<String>,
        line: &str,
    ) -> Self {
        Error::Classification {
            shape,
            field,
            raw: raw.into(),
            line: line.to_string(),
        }
    }

    /// Whether this error signals a pattern/grammar mismatch.
    pub fn is_classification(&self) -> bool {
        matches!(self, Error::Classification { .. })
    }
}

impl From<pdf_extract::OutputError> for Error {
    fn from(err: pdf_extract::OutputError) -> Self {
        Error::TextExtract(err.to_string())
    }
}
