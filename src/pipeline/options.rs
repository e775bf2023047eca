//! Engine configuration.

use std::time::Duration;

use crate::analysis::content::{DEFAULT_CONTENT_LIMIT, DEFAULT_MAX_CONTENT_CHARS};
use crate::analysis::lexicon::DomainLexicon;
use crate::analysis::select::DEFAULT_SELECTION_LIMIT;
use crate::analysis::titles::DEFAULT_FALLBACK_LIMIT;

/// Per-document analysis budget used by [`EngineOptions::default`].
pub const DEFAULT_DOCUMENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sections reported per document before the collection-wide selection.
pub const DEFAULT_SECTIONS_PER_DOCUMENT: usize = 5;

/// Options for the analysis engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Analyze the documents of a collection in parallel
    pub parallel: bool,

    /// Per-document budget (`None` = unlimited)
    pub timeout: Option<Duration>,

    /// Lexicon seeding persona requirements and boosts
    pub lexicon: DomainLexicon,

    /// Sections kept per document
    pub sections_per_document: usize,

    /// Excerpts kept per document
    pub content_per_document: usize,

    /// Maximum excerpt length in characters
    pub max_content_chars: usize,

    /// Candidates kept by the title pattern fallback
    pub fallback_limit: usize,

    /// Sections and excerpts in the collection output
    pub selection_limit: usize,
}

impl EngineOptions {
    /// Create new engine options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel document analysis.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel document analysis.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the per-document timeout (`None` disables it).
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the domain lexicon.
    pub fn with_lexicon(mut self, lexicon: DomainLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Set how many sections each document contributes.
    pub fn with_sections_per_document(mut self, limit: usize) -> Self {
        self.sections_per_document = limit;
        self
    }

    /// Set how many excerpts each document contributes.
    pub fn with_content_per_document(mut self, limit: usize) -> Self {
        self.content_per_document = limit;
        self
    }

    /// Set the maximum excerpt length in characters.
    pub fn with_max_content_chars(mut self, max_chars: usize) -> Self {
        self.max_content_chars = max_chars;
        self
    }

    /// Set how many candidates the title pattern fallback keeps.
    pub fn with_fallback_limit(mut self, limit: usize) -> Self {
        self.fallback_limit = limit;
        self
    }

    /// Set the size of the collection-wide section and excerpt lists.
    pub fn with_selection_limit(mut self, limit: usize) -> Self {
        self.selection_limit = limit;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            timeout: Some(DEFAULT_DOCUMENT_TIMEOUT),
            lexicon: DomainLexicon::dietary(),
            sections_per_document: DEFAULT_SECTIONS_PER_DOCUMENT,
            content_per_document: DEFAULT_CONTENT_LIMIT,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
            selection_limit: DEFAULT_SELECTION_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_options_builder() {
        let options = EngineOptions::new()
            .sequential()
            .with_timeout(None)
            .with_lexicon(DomainLexicon::empty())
            .with_selection_limit(3);

        assert!(!options.parallel);
        assert!(options.timeout.is_none());
        assert!(options.lexicon.is_empty());
        assert_eq!(options.selection_limit, 3);
    }

    #[test]
    fn test_default_options() {
        let options = EngineOptions::default();
        assert!(options.parallel);
        assert_eq!(options.timeout, Some(Duration::from_secs(60)));
        assert!(!options.lexicon.is_empty());
        assert_eq!(options.sections_per_document, 5);
        assert_eq!(options.content_per_document, 5);
        assert_eq!(options.max_content_chars, 1000);
        assert_eq!(options.fallback_limit, 8);
    }
}
