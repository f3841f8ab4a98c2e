//! Extraction options and report grammar.

use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// Literal tokens describing one lab vendor's report layout.
///
/// Everything the recognizers match on besides the numeric shapes lives
/// here, so the same engine can be pointed at another report grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    /// Recognized unit tokens, tried in order (longer variants first)
    pub units: Vec<String>,

    /// Marker that precedes the analysis title
    pub title_start: String,

    /// Marker that follows the analysis title
    pub title_end: String,

    /// Marker for analytes below the detection limit
    pub not_detected: String,

    /// Token a not-detected line is split at
    pub not_detected_split: String,

    /// Marker for lines stating there is no reference interval
    pub no_reference: String,
}

impl Grammar {
    /// Russian-language Helix report layout.
    pub fn helix() -> Self {
        Self {
            units: to_owned(&[
                "нмоль/мл",
                "мкмоль/л",
                "нмоль/л",
                "ммоль/моль креат.",
                "у.е./моль креат.",
                "ммоль/л",
            ]),
            title_start: "(врач):".to_string(),
            title_end: "Метод:".to_string(),
            not_detected: "не обнаружено".to_string(),
            not_detected_split: "0.00".to_string(),
            no_reference: "Референсные значения не".to_string(),
        }
    }

    /// English rendition of the Helix layout.
    pub fn english() -> Self {
        Self {
            units: to_owned(&[
                "nmol/ml",
                "µmol/l",
                "nmol/l",
                "mmol/mol creat.",
                "c.u./mol creat.",
                "mmol/l",
            ]),
            title_start: "(authored by):".to_string(),
            title_end: "Method:".to_string(),
            not_detected: "not detected".to_string(),
            not_detected_split: "0.00".to_string(),
            no_reference: "Reference values not".to_string(),
        }
    }

    /// Replace the unit vocabulary.
    pub fn with_units<S: Into<String>>(mut self, units: impl IntoIterator<Item = S>) -> Self {
        self.units = units.into_iter().map(Into::into).collect();
        self
    }

    /// Add one unit token at the end of the vocabulary.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.units.push(unit.into());
        self
    }

    /// Set the title delimiter pair.
    pub fn with_title_markers(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.title_start = start.into();
        self.title_end = end.into();
        self
    }

    /// Set the not-detected marker.
    pub fn with_not_detected(mut self, marker: impl Into<String>) -> Self {
        self.not_detected = marker.into();
        self
    }

    /// Set the token not-detected lines are split at.
    pub fn with_not_detected_split(mut self, token: impl Into<String>) -> Self {
        self.not_detected_split = token.into();
        self
    }

    /// Set the no-reference marker.
    pub fn with_no_reference(mut self, marker: impl Into<String>) -> Self {
        self.no_reference = marker.into();
        self
    }

    /// Check that every token the recognizers need is non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.units.is_empty() || self.units.iter().any(|u| u.trim().is_empty()) {
            return Err(Error::InvalidGrammar(
                "unit vocabulary must contain non-empty tokens".to_string(),
            ));
        }
        let markers = [
            ("title_start", &self.title_start),
            ("title_end", &self.title_end),
            ("not_detected", &self.not_detected),
            ("not_detected_split", &self.not_detected_split),
            ("no_reference", &self.no_reference),
        ];
        for (field, value) in markers {
            if value.is_empty() {
                return Err(Error::InvalidGrammar(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::helix()
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Options for extracting measurements from a document.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Report grammar
    pub grammar: Grammar,

    /// Normalize page text to Unicode NFC before classification
    pub normalize_unicode: bool,

    /// Which pages to process
    pub pages: PageSelection,

    /// Input file size limit in MB (0 = unlimited)
    pub max_file_size_mb: u32,

    /// Process independent documents in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report grammar.
    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the input size limit in MB.
    pub fn with_max_file_size(mut self, mb: u32) -> Self {
        self.max_file_size_mb = mb;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Size limit in bytes, if any.
    pub fn max_file_size_bytes(&self) -> Option<u64> {
        (self.max_file_size_mb > 0).then(|| u64::from(self.max_file_size_mb) * 1024 * 1024)
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            grammar: Grammar::default(),
            normalize_unicode: true,
            pages: PageSelection::All,
            max_file_size_mb: 10,
            parallel: true,
        }
    }
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "2-4", "1,3,5-7").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());
        let page = |p: &str| -> Result<u32> {
            match p.trim().parse::<u32>() {
                Ok(0) | Err(_) => Err(invalid()),
                Ok(n) => Ok(n),
            }
        };

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (page(start)?, page(end)?);
                if start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(page(start)?..=page(end)?),
                None => pages.push(page(part)?),
            }
        }
        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}
