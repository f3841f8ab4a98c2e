//! Document-level aggregation.

use log::{debug, info};
use rayon::prelude::*;

use super::{ExtractOptions, PageExtractor, PageSelection};
use crate::error::Result;
use crate::model::{Measurement, MeasurementTable, TableBuilder};

/// Measurements and title for a whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentExtraction {
    /// Measurements in page order, then line order
    pub measurements: Vec<Measurement>,

    /// First non-empty title found (empty if none)
    pub title: String,

    /// Number of pages that were processed
    pub pages_processed: u32,
}

impl DocumentExtraction {
    /// Whether no measurement was found on any page.
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Convert into the typed table.
    pub fn to_table(&self) -> MeasurementTable {
        let mut builder = TableBuilder::new().with_title(self.title.clone());
        builder.extend(&self.measurements);
        builder.build()
    }

    /// Convert into the typed table, consuming the extraction.
    pub fn into_table(self) -> MeasurementTable {
        let mut builder = TableBuilder::new().with_title(self.title);
        builder.extend(self.measurements);
        builder.build()
    }
}

/// Drives a [`PageExtractor`] over the pages of a document.
///
/// The first non-empty page title becomes the document title; titles on
/// later pages are ignored.
#[derive(Debug)]
pub struct DocumentAggregator {
    pages: PageExtractor,
    selection: PageSelection,
    parallel: bool,
}

impl DocumentAggregator {
    /// Create an aggregator from options.
    pub fn new(options: &ExtractOptions) -> Result<Self> {
        Ok(Self {
            pages: PageExtractor::new(options)?,
            selection: options.pages.clone(),
            parallel: options.parallel,
        })
    }

    /// Create an aggregator around an existing page extractor.
    pub fn from_page_extractor(pages: PageExtractor) -> Self {
        Self {
            pages,
            selection: PageSelection::All,
            parallel: true,
        }
    }

    /// Restrict which pages are processed.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.selection = selection;
        self
    }

    /// The page extractor in use.
    pub fn page_extractor(&self) -> &PageExtractor {
        &self.pages
    }

    /// Aggregate the pages of one document, in order.
    pub fn aggregate<I, S>(&self, pages: I) -> Result<DocumentExtraction>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = DocumentExtraction::default();

        for (index, text) in pages.into_iter().enumerate() {
            let number = index as u32 + 1;
            if !self.selection.includes(number) {
                continue;
            }
            let page = self.pages.extract(text.as_ref())?;
            debug!("page {}: {} measurements", number, page.measurements.len());

            doc.measurements.extend(page.measurements);
            if doc.title.is_empty() && !page.title.is_empty() {
                doc.title = page.title;
            }
            doc.pages_processed += 1;
        }

        info!(
            "document: {} measurements over {} pages, title {:?}",
            doc.measurements.len(),
            doc.pages_processed,
            doc.title
        );
        Ok(doc)
    }

    /// Aggregate several independent documents.
    ///
    /// Results come back in input order. Documents are processed in
    /// parallel unless the aggregator was built with `sequential()`.
    pub fn aggregate_many<S>(&self, documents: &[Vec<S>]) -> Vec<Result<DocumentExtraction>>
    where
        S: AsRef<str> + Sync,
    {
        if self.parallel {
            documents
                .par_iter()
                .map(|pages| self.aggregate(pages))
                .collect()
        } else {
            documents.iter().map(|pages| self.aggregate(pages)).collect()
        }
    }
}
