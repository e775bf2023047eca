//! PDF decoding module.

mod backend;
mod decoder;
mod layout;
mod options;

pub use backend::{decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use decoder::{DocumentDecoder, PdfDecoder};
pub use layout::{
    build_page, group_lines_into_paragraphs, group_spans_into_lines, LayoutAnalyzer, TextLine,
    TextSpan,
};
pub use options::{DecodeOptions, ErrorMode};
