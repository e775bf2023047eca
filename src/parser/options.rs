//! Decoding options.

/// Options for decoding PDF documents.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Error handling mode for individual pages
    pub error_mode: ErrorMode,

    /// Skip pages whose text is empty after decoding
    pub skip_empty_pages: bool,
}

impl DecodeOptions {
    /// Create new decode options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (keep going past broken pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable dropping empty pages.
    pub fn with_skip_empty_pages(mut self, skip: bool) -> Self {
        self.skip_empty_pages = skip;
        self
    }
}

/// Error handling mode during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any page error
    #[default]
    Strict,
    /// Log the page error and continue with an empty page
    Lenient,
}
