//! Analysis title extraction.

use super::Grammar;

/// Pulls the analysis name out of a page header.
///
/// The title is the text between the first "authored by" marker and the
/// first "method" marker. Only first occurrences are used, so a page where
/// the method marker comes first yields an empty title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleExtractor {
    start: String,
    end: String,
}

impl TitleExtractor {
    /// Create an extractor for a marker pair.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Create an extractor using a grammar's title markers.
    pub fn from_grammar(grammar: &Grammar) -> Self {
        Self::new(grammar.title_start.clone(), grammar.title_end.clone())
    }

    /// Extract the trimmed title, or `""` when the markers are missing.
    pub fn extract<'a>(&self, text: &'a str) -> &'a str {
        let (Some(start), Some(end)) = (text.find(&self.start), text.find(&self.end)) else {
            return "";
        };
        let start = start + self.start.len();
        if start >= end {
            return "";
        }
        text[start..end].trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> TitleExtractor {
        TitleExtractor::from_grammar(&Grammar::english())
    }

    #[test]
    fn test_extract_between_markers() {
        assert_eq!(
            english().extract("(authored by): Dr. X Method: Blood test"),
            "Dr. X"
        );
    }

    #[test]
    fn test_extract_helix() {
        let titles = TitleExtractor::from_grammar(&Grammar::helix());
        let text = "\n(врач): Доктор Айболит Метод: Анализ крови\nМолочная кислота 5.1 ммоль/л 4.5 - 9.0\n";
        assert_eq!(titles.extract(text), "Доктор Айболит");
    }

    #[test]
    fn test_extract_spans_lines() {
        let text = "(authored by):\n  Organic acids\n  in urine \nMethod: GC-MS";
        assert_eq!(english().extract(text), "Organic acids\n  in urine");
    }

    #[test]
    fn test_missing_marker_gives_empty() {
        assert_eq!(english().extract("(authored by): Dr. X"), "");
        assert_eq!(english().extract("Method: Blood test"), "");
        assert_eq!(english().extract(""), "");
    }

    #[test]
    fn test_reversed_markers_give_empty() {
        assert_eq!(
            english().extract("Method: Blood test (authored by): Dr. X Method: again"),
            ""
        );
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = english();
        let text = "header\n(authored by):  Panel 7  Method: LC\nfooter";
        assert_eq!(extractor.extract(text), extractor.extract(text));
        assert_eq!(extractor.extract(text), "Panel 7");
    }
}
