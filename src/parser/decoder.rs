//! Document decoding: PDF files to [`DocumentText`].

use std::path::Path;

use crate::detect::{document_name, sniff_bytes, sniff_path};
use crate::error::{Error, Result};
use crate::model::{DocumentText, PageText};

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::LayoutAnalyzer;
use super::options::{DecodeOptions, ErrorMode};

/// Turns a document on disk into per-page text and line blocks.
///
/// The pipeline only depends on this trait, so tests and callers with
/// their own extraction can plug in a different implementation.
pub trait DocumentDecoder: Send + Sync {
    /// Decode the document at `path`.
    fn decode(&self, path: &Path) -> Result<DocumentText>;
}

/// [`DocumentDecoder`] for PDF files, backed by `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct PdfDecoder {
    options: DecodeOptions,
}

impl PdfDecoder {
    /// Create a decoder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with custom options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Decode an in-memory PDF, naming the result `name`.
    pub fn decode_bytes(&self, name: &str, data: &[u8]) -> Result<DocumentText> {
        sniff_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        self.decode_backend(name, &backend)
    }

    /// Decode every page reachable through `backend`.
    pub fn decode_backend(&self, name: &str, backend: &dyn PdfBackend) -> Result<DocumentText> {
        let analyzer = LayoutAnalyzer::new(backend);
        let mut document = DocumentText::new(name);

        for (number, page_id) in backend.pages() {
            let page = match analyzer.page_text(number, page_id) {
                Ok(page) => page,
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("{name}: failed to decode page {number}: {e}");
                    PageText::new(number, "", Vec::new())
                }
                Err(e) => {
                    return Err(Error::DocumentDecode {
                        document: name.to_string(),
                        reason: format!("page {number}: {e}"),
                    })
                }
            };
            if self.options.skip_empty_pages && page.is_empty() {
                continue;
            }
            document.add_page(page);
        }

        log::debug!(
            "{name}: decoded {} pages, {} blocks",
            document.page_count(),
            document.block_count()
        );
        Ok(document)
    }
}

impl DocumentDecoder for PdfDecoder {
    fn decode(&self, path: &Path) -> Result<DocumentText> {
        let name = document_name(path);
        sniff_path(path)?;
        let backend = LopdfBackend::load_file(path)?;
        self.decode_backend(&name, &backend)
    }
}
