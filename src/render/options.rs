//! Rendering options and configuration.

/// Options for rendering a measurement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Width of the text gauge in characters (0 = no gauge)
    pub gauge_width: usize,

    /// Wrap the title after this many words (0 = no wrapping)
    pub max_words_per_title_line: usize,

    /// Render the document title as a header
    pub include_title: bool,

    /// Add a status column (low / normal / high ...)
    pub include_status: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gauge width.
    pub fn with_gauge_width(mut self, width: usize) -> Self {
        self.gauge_width = width;
        self
    }

    /// Set the title wrapping width in words.
    pub fn with_title_wrap(mut self, words: usize) -> Self {
        self.max_words_per_title_line = words;
        self
    }

    /// Enable or disable the title header.
    pub fn with_title(mut self, include: bool) -> Self {
        self.include_title = include;
        self
    }

    /// Enable or disable the status column.
    pub fn with_status(mut self, include: bool) -> Self {
        self.include_status = include;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gauge_width: 30,
            max_words_per_title_line: 8,
            include_title: true,
            include_status: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_gauge_width(0)
            .with_title_wrap(4)
            .with_title(false)
            .with_status(false);

        assert_eq!(options.gauge_width, 0);
        assert_eq!(options.max_words_per_title_line, 4);
        assert!(!options.include_title);
        assert!(!options.include_status);
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.gauge_width, 30);
        assert_eq!(options.max_words_per_title_line, 8);
        assert!(options.include_title);
    }
}
