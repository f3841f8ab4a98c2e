//! Page text sources.
//!
//! The engine itself only consumes page text. These sources produce it
//! from a plain-text export (pages separated by form feeds, as `pdftotext`
//! writes them) or from a PDF's text layer via `pdf-extract`.

use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::detect::{detect_format_from_bytes, InputFormat};
use crate::error::{Error, Result};

/// Page separator in plain-text exports.
pub const PAGE_BREAK: char = '\u{000C}';

/// Something that yields the text of each page, in document order.
pub trait PageSource {
    /// Format of the underlying input.
    fn format(&self) -> InputFormat;

    /// Text of every page, in order.
    fn pages(&self) -> Result<Vec<String>>;
}

/// Plain text with form-feed page breaks.
#[derive(Debug, Clone)]
pub struct TextPages {
    text: String,
}

impl TextPages {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PageSource for TextPages {
    fn format(&self) -> InputFormat {
        InputFormat::Text
    }

    fn pages(&self) -> Result<Vec<String>> {
        let mut pages: Vec<String> = self.text.split(PAGE_BREAK).map(str::to_string).collect();
        // pdftotext ends the last page with a form feed too
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        Ok(pages)
    }
}

/// Text layer of a PDF document.
#[derive(Debug, Clone)]
pub struct PdfPages {
    data: Vec<u8>,
    version: String,
}

impl PdfPages {
    /// Wrap PDF bytes. The header is checked but the body is not parsed
    /// until [`PageSource::pages`] is called.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        match detect_format_from_bytes(&data)? {
            InputFormat::Pdf { version } => Ok(Self { data, version }),
            InputFormat::Text => Err(Error::UnknownFormat),
        }
    }
}

impl PageSource for PdfPages {
    fn format(&self) -> InputFormat {
        InputFormat::Pdf {
            version: self.version.clone(),
        }
    }

    fn pages(&self) -> Result<Vec<String>> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(&self.data)?;
        for (i, page) in pages.iter().enumerate() {
            if page.trim().is_empty() {
                warn!("page {} has no text layer", i + 1);
            }
        }
        debug!("extracted {} pages from PDF {}", pages.len(), self.version);
        Ok(pages)
    }
}

/// Pick a page source for raw input bytes.
pub fn source_from_bytes(data: Vec<u8>) -> Result<Box<dyn PageSource>> {
    match detect_format_from_bytes(&data)? {
        InputFormat::Pdf { .. } => Ok(Box::new(PdfPages::new(data)?)),
        InputFormat::Text => {
            let text = String::from_utf8(data).map_err(|_| Error::UnknownFormat)?;
            Ok(Box::new(TextPages::new(text)))
        }
    }
}

/// Open a file as a page source, enforcing an optional size limit.
pub fn open_source<P: AsRef<Path>>(path: P, max_bytes: Option<u64>) -> Result<Box<dyn PageSource>> {
    let path = path.as_ref();
    if let Some(limit) = max_bytes {
        let size = fs::metadata(path)?.len();
        if size > limit {
            return Err(Error::FileTooLarge { size, limit });
        }
    }
    debug!("reading {}", path.display());
    source_from_bytes(fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_text_pages_split_on_form_feed() {
        let source = TextPages::new("page one\n\u{000C}page two\n\u{000C}");
        assert_eq!(source.pages().unwrap(), vec!["page one\n", "page two\n"]);
        assert_eq!(source.format(), InputFormat::Text);
    }

    #[test]
    fn test_text_pages_single_page() {
        let source = TextPages::new("only page");
        assert_eq!(source.pages().unwrap(), vec!["only page"]);

        let empty = TextPages::new("");
        assert_eq!(empty.pages().unwrap(), vec![""]);
    }

    #[test]
    fn test_source_from_bytes_text() {
        let source = source_from_bytes(b"Glucose 5.1 mmol/l 3.9 - 6.1".to_vec()).unwrap();
        assert_eq!(source.format(), InputFormat::Text);
        assert_eq!(source.pages().unwrap().len(), 1);
    }

    #[test]
    fn test_source_from_bytes_rejects_binary() {
        assert!(matches!(
            source_from_bytes(vec![0xFF, 0x00, 0x13]),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_pdf_pages_rejects_text() {
        assert!(matches!(
            PdfPages::new(b"plain".to_vec()),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_open_source_size_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'a'; 64]).unwrap();

        let err = open_source(file.path(), Some(16)).err().unwrap();
        assert!(matches!(err, Error::FileTooLarge { size: 64, limit: 16 }));

        assert!(open_source(file.path(), Some(64)).is_ok());
        assert!(open_source(file.path(), None).is_ok());
    }
}
