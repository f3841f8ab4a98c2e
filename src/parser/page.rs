//! Per-page extraction.

use log::debug;
use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

use super::{ExtractOptions, LineClassifier, TitleExtractor};
use crate::error::Result;
use crate::model::Measurement;

/// Measurements and title found on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtraction {
    /// Measurements in line order
    pub measurements: Vec<Measurement>,

    /// Title found on this page (empty if none)
    pub title: String,
}

/// Runs the line classifier over every line of a page.
///
/// Lines are independent: nothing is carried from one line to the next,
/// so a reference interval can never span lines.
#[derive(Debug)]
pub struct PageExtractor {
    classifier: LineClassifier,
    titles: TitleExtractor,
    normalize_unicode: bool,
}

impl PageExtractor {
    /// Create a page extractor from options.
    pub fn new(options: &ExtractOptions) -> Result<Self> {
        Ok(Self {
            classifier: LineClassifier::new(&options.grammar)?,
            titles: TitleExtractor::from_grammar(&options.grammar),
            normalize_unicode: options.normalize_unicode,
        })
    }

    /// Create a page extractor from already-built parts.
    pub fn from_parts(classifier: LineClassifier, titles: TitleExtractor) -> Self {
        Self {
            classifier,
            titles,
            normalize_unicode: false,
        }
    }

    /// Enable or disable NFC normalization of page text.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// The classifier used for each line.
    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Extract measurements and title from one page of text.
    pub fn extract(&self, text: &str) -> Result<PageExtraction> {
        let text: Cow<'_, str> = if self.normalize_unicode {
            Cow::Owned(text.nfc().collect())
        } else {
            Cow::Borrowed(text)
        };

        let mut measurements = Vec::new();
        let mut line_count = 0usize;
        for line in text.lines() {
            line_count += 1;
            if let Some(m) = self.classifier.classify(line)? {
                measurements.push(m);
            }
        }

        debug!(
            "page: {} measurements from {} lines",
            measurements.len(),
            line_count
        );

        Ok(PageExtraction {
            measurements,
            title: self.titles.extract(&text).to_string(),
        })
    }
}
