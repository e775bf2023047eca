//! Data model shared by the decoder, the analysis stages and the output.
//!
//! Decoded text flows in as [`DocumentText`]; analysis produces
//! [`TitleCandidate`]s and [`ContentBlock`]s; the selection stage emits the
//! serializable records in [`output`].

mod block;
mod candidate;
mod document;
pub mod output;

pub use block::{BoundingBox, TextBlock, DEFAULT_FONT_SIZE};
pub use candidate::{normalized_title, ContentBlock, DetectionMethod, TitleCandidate};
pub use document::{DocumentText, PageText};
pub use output::{
    CollectionOutput, DocumentAnalysis, ExtractedSection, InputMetadata, JobToBeDone,
    OutputMetadata, Persona, SubsectionAnalysis, METADATA_FILE,
};
