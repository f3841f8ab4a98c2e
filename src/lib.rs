//! # labscan
//!
//! Extraction of measurements from laboratory analysis reports.
//!
//! Each line of page text is classified into one of a few recognized
//! shapes (value with reference interval, "not detected", value without
//! reference, dimensionless ratio). Matching lines become
//! [`Measurement`] records; the document title is taken from the report
//! header. The result is a typed five-column [`MeasurementTable`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use labscan::{extract_file, render};
//!
//! fn main() -> labscan::Result<()> {
//!     let table = extract_file("report.pdf")?;
//!
//!     let options = render::RenderOptions::default();
//!     println!("{}", render::to_text(&table, &options)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Ordered classification cascade**: first matching line shape wins
//! - **Configurable grammar**: unit vocabulary and header markers
//! - **Tolerant table building**: unparseable cells become missing
//! - **Multiple output formats**: JSON, Markdown, plain text with gauges
//! - **Parallel processing**: Uses Rayon for batches of documents

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, InputFormat};
pub use error::{Error, Result};
pub use model::{
    LineMatch, LineShape, Measurement, MeasurementTable, RawRow, RawValue, ReferenceInterval,
    Status, TableBuilder, TableRow,
};
pub use parser::{
    DocumentAggregator, DocumentExtraction, ExtractOptions, Grammar, LineClassifier,
    PageExtractor, PageSelection, TitleExtractor,
};
pub use render::{JsonFormat, RenderOptions};
pub use source::{open_source, source_from_bytes, PageSource, PdfPages, TextPages};

use std::path::Path;

/// Extract a table from page texts using the default grammar.
///
/// # Example
///
/// ```
/// let page = "Lactic acid 5.116 mmol/mol creat. 4.5 - 9.0";
/// let options = labscan::ExtractOptions::new().with_grammar(labscan::Grammar::english());
/// let table = labscan::extract_pages_with_options([page], &options).unwrap();
/// assert_eq!(table.row_count(), 1);
/// ```
pub fn extract_pages<I, S>(pages: I) -> Result<MeasurementTable>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extract_pages_with_options(pages, &ExtractOptions::default())
}

/// Extract a table from page texts with custom options.
pub fn extract_pages_with_options<I, S>(pages: I, options: &ExtractOptions) -> Result<MeasurementTable>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let aggregator = DocumentAggregator::new(options)?;
    Ok(aggregator.aggregate(pages)?.into_table())
}

/// Extract a table from a PDF or plain-text report file.
///
/// # Example
///
/// ```no_run
/// use labscan::extract_file;
///
/// let table = extract_file("report.pdf").unwrap();
/// println!("{} measurements", table.row_count());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<MeasurementTable> {
    extract_file_with_options(path, &ExtractOptions::default())
}

/// Extract a table from a file with custom options.
///
/// The file size limit in `options` is checked before the file is read.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<MeasurementTable> {
    let source = open_source(path, options.max_file_size_bytes())?;
    extract_pages_with_options(source.pages()?, options)
}

/// Extract a table from raw file content.
pub fn extract_bytes(data: &[u8], options: &ExtractOptions) -> Result<MeasurementTable> {
    if let Some(limit) = options.max_file_size_bytes() {
        let size = data.len() as u64;
        if size > limit {
            return Err(Error::FileTooLarge { size, limit });
        }
    }
    let source = source_from_bytes(data.to_vec())?;
    extract_pages_with_options(source.pages()?, options)
}

/// Extract several independent documents, each given as its page texts.
///
/// Results are returned in input order; one failing document does not
/// affect the others.
pub fn extract_documents<S>(
    documents: &[Vec<S>],
    options: &ExtractOptions,
) -> Result<Vec<Result<MeasurementTable>>>
where
    S: AsRef<str> + Sync,
{
    let aggregator = DocumentAggregator::new(options)?;
    Ok(aggregator
        .aggregate_many(documents)
        .into_iter()
        .map(|doc| doc.map(DocumentExtraction::into_table))
        .collect())
}

/// Builder for extracting and rendering lab reports.
///
/// # Example
///
/// ```no_run
/// use labscan::Labscan;
///
/// let markdown = Labscan::new()
///     .english()
///     .sequential()
///     .extract_file("report.pdf")?
///     .to_markdown()?;
/// # Ok::<(), labscan::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Labscan {
    extract_options: ExtractOptions,
    render_options: RenderOptions,
}

impl Labscan {
    /// Create a new builder with the default grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the English report grammar.
    pub fn english(self) -> Self {
        self.with_grammar(Grammar::english())
    }

    /// Use a custom grammar.
    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.extract_options = self.extract_options.with_grammar(grammar);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extract_options = self.extract_options.with_pages(pages);
        self
    }

    /// Set the file size limit in megabytes (0 = unlimited).
    pub fn with_max_file_size(mut self, mb: u32) -> Self {
        self.extract_options = self.extract_options.with_max_file_size(mb);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.extract_options = self.extract_options.sequential();
        self
    }

    /// Set render options for the result.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Extract from a file.
    pub fn extract_file<P: AsRef<Path>>(self, path: P) -> Result<LabscanResult> {
        let table = extract_file_with_options(path, &self.extract_options)?;
        Ok(self.finish(table))
    }

    /// Extract from raw file content.
    pub fn extract_bytes(self, data: &[u8]) -> Result<LabscanResult> {
        let table = extract_bytes(data, &self.extract_options)?;
        Ok(self.finish(table))
    }

    /// Extract from page texts.
    pub fn extract_pages<I, S>(self, pages: I) -> Result<LabscanResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = extract_pages_with_options(pages, &self.extract_options)?;
        Ok(self.finish(table))
    }

    fn finish(self, table: MeasurementTable) -> LabscanResult {
        LabscanResult {
            table,
            render_options: self.render_options,
        }
    }
}

/// Result of extracting a report.
#[derive(Debug, Clone)]
pub struct LabscanResult {
    /// The extracted table
    pub table: MeasurementTable,
    /// Render options to use
    render_options: RenderOptions,
}

impl LabscanResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.table, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.table, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.table, format)
    }

    /// Get the table.
    pub fn table(&self) -> &MeasurementTable {
        &self.table
    }

    /// Whether no measurement was found.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
Analysis (authored by): Organic acids Method: LC-MS
Lactic acid 5.116 mmol/mol creat. 4.5 - 9.0
Oxalic acid 40 mmol/mol creat. Reference values not defined
Citric acid/Succinic acid 1.2 0.5 - 1.5
Page footer";

    #[test]
    fn test_labscan_builder() {
        let builder = Labscan::new().english().sequential();
        assert_eq!(builder.extract_options.grammar, Grammar::english());
        assert!(!builder.extract_options.parallel);
    }

    #[test]
    fn test_labscan_builder_default() {
        let builder = Labscan::default();
        assert_eq!(builder.extract_options.grammar, Grammar::helix());
        assert_eq!(builder.extract_options.max_file_size_mb, 10);
        assert_eq!(builder.render_options, RenderOptions::default());
    }

    #[test]
    fn test_labscan_builder_with_pages() {
        let builder = Labscan::new().with_pages(PageSelection::Range(1..=2));
        assert!(matches!(
            builder.extract_options.pages,
            PageSelection::Range(_)
        ));
    }

    #[test]
    fn test_extract_pages_english() {
        let result = Labscan::new().english().extract_pages([PAGE]).unwrap();
        let table = result.table();

        assert_eq!(table.title, "Organic acids");
        assert_eq!(table.names, vec!["Lactic acid", "Oxalic acid", "Citric acid/Succinic acid"]);
        assert_eq!(table.values, vec![Some(5.116), Some(40.0), Some(1.2)]);
        assert_eq!(table.ref_mins, vec![Some(4.5), None, Some(0.5)]);
        assert_eq!(table.units, vec!["mmol/mol creat.", "mmol/mol creat.", ""]);
    }

    #[test]
    fn test_extract_pages_default_grammar_ignores_english_units() {
        // English units are not in the default vocabulary, but the
        // interval still makes the line ranged with no unit.
        let table = extract_pages(["Lactic acid 5.116 4.5 - 9.0"]).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.units, vec![""]);
    }

    #[test]
    fn test_extract_bytes_text() {
        let options = ExtractOptions::new().with_grammar(Grammar::english());
        let table = extract_bytes(PAGE.as_bytes(), &options).unwrap();
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_extract_bytes_empty_data() {
        // Empty input is a text document with no measurements
        let table = extract_bytes(b"", &ExtractOptions::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_extract_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
        assert!(extract_bytes(&data, &ExtractOptions::default()).is_err());
    }

    #[test]
    fn test_extract_bytes_too_large() {
        let data = vec![b'a'; 2 * 1024 * 1024];
        let options = ExtractOptions::new().with_max_file_size(1);
        assert!(matches!(
            extract_bytes(&data, &options),
            Err(Error::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_extract_documents_in_order() {
        let options = ExtractOptions::new().with_grammar(Grammar::english());
        let docs = vec![
            vec!["A acid 1.0 mmol/l 0.5 - 2.0"],
            vec!["B acid 1..2 mmol/l 0.5 - 2.0"],
            vec![],
        ];
        let results = extract_documents(&docs, &options).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().names, vec!["A acid"]);
        assert!(results[1].is_err());
        assert!(results[2].as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_result_renderers() {
        let result = Labscan::new().english().extract_pages([PAGE]).unwrap();
        assert!(!result.is_empty());
        assert!(result.to_markdown().unwrap().contains("| Lactic acid |"));
        assert!(result.to_text().unwrap().starts_with("Organic acids"));
        assert!(result
            .to_json(JsonFormat::Compact)
            .unwrap()
            .contains("\"row_count\":3"));
    }
}
