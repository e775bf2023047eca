//! # docsift
//!
//! Persona-driven section and passage ranking for PDF collections.
//!
//! A collection is a directory of PDF files plus a `challenge1b_input.json`
//! naming a persona and the job they need done. docsift decodes every
//! document, proposes section titles and content excerpts, scores them
//! against the persona, and writes the most relevant ones to
//! `<collection>_output.json`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsift::run_batch;
//!
//! fn main() -> docsift::Result<()> {
//!     // Every subdirectory of `input` is a collection
//!     let summary = run_batch("input", "output")?;
//!     println!("{summary}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Title detection**: font-size, pattern and isolated-line strategies
//! - **Persona awareness**: dietary and other requirement terms filter and boost
//! - **Diversification**: results spread across documents and pages
//! - **Parallel processing**: Uses Rayon across the documents of a collection
//! - **Symbol cleanup**: ligatures, bullets and typographic noise normalized

pub mod analysis;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use analysis::{DomainLexicon, PersonaProfile};
pub use detect::{list_pdf_documents, sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    CollectionOutput, DocumentAnalysis, DocumentText, ExtractedSection, InputMetadata, PageText,
    SubsectionAnalysis, TextBlock,
};
pub use parser::{DecodeOptions, DocumentDecoder, ErrorMode, PdfDecoder};
pub use pipeline::{
    BatchObserver, BatchSummary, CollectionOutcome, DefaultObserver, Engine, EngineOptions,
};
pub use render::{clean_special_symbols, JsonFormat};

use std::path::Path;

/// Decode a PDF file into per-page text and line blocks.
///
/// # Example
///
/// ```no_run
/// use docsift::decode_file;
///
/// let doc = decode_file("menu.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DocumentText> {
    PdfDecoder::new().decode(path.as_ref())
}

/// Decode an in-memory PDF.
pub fn decode_bytes(name: &str, data: &[u8]) -> Result<DocumentText> {
    PdfDecoder::new().decode_bytes(name, data)
}

/// Analyze one collection directory with default options.
///
/// # Example
///
/// ```no_run
/// use docsift::analyze_collection;
///
/// let output = analyze_collection("input/Collection 1").unwrap();
/// for section in &output.extracted_sections {
///     println!("{} {}", section.importance_rank, section.section_title);
/// }
/// ```
pub fn analyze_collection<P: AsRef<Path>>(dir: P) -> Result<CollectionOutput> {
    Engine::new().analyze_collection(dir)
}

/// Analyze one collection and write its output file into `output_dir`.
pub fn process_collection<P, Q>(dir: P, output_dir: Q) -> Result<CollectionOutcome>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Engine::new().process_collection(dir, output_dir)
}

/// Process every collection under `input_dir` with default options.
pub fn run_batch<P, Q>(input_dir: P, output_dir: Q) -> Result<BatchSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Engine::new().run_batch(input_dir, output_dir)
}
