//! Collection processing: decode, analyze, select and write.
//!
//! The [`Engine`] owns a [`DocumentDecoder`] and the [`EngineOptions`].
//! Each document of a collection is decoded and analyzed independently
//! (in parallel by default, with a per-document timeout); the results are
//! then merged into one [`CollectionOutput`](crate::model::CollectionOutput).

mod collection;
mod document;
mod options;

use std::sync::Arc;

use crate::parser::{DocumentDecoder, PdfDecoder};

pub use collection::{
    collection_name, list_collections, output_file_name, processing_timestamp, BatchObserver,
    BatchSummary, CollectionOutcome, DefaultObserver,
};
pub use document::analyze_document;
pub use options::{EngineOptions, DEFAULT_DOCUMENT_TIMEOUT, DEFAULT_SECTIONS_PER_DOCUMENT};

/// Persona-driven relevance engine.
#[derive(Clone)]
pub struct Engine {
    decoder: Arc<dyn DocumentDecoder>,
    options: Arc<EngineOptions>,
}

impl Engine {
    /// Create an engine with the PDF decoder and default options.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create an engine with the PDF decoder and custom options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            decoder: Arc::new(PdfDecoder::new()),
            options: Arc::new(options),
        }
    }

    /// Replace the document decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn DocumentDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Get the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
