//! Error types for docsift library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding and ranking collections.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Metadata could not be parsed or output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The collection has no `challenge1b_input.json`.
    #[error("Missing collection metadata: {}", .0.display())]
    MissingMetadata(PathBuf),

    /// The collection contains no PDF documents.
    #[error("No PDF documents found in {}", .0.display())]
    NoDocuments(PathBuf),

    /// A single document could not be decoded.
    #[error("Failed to decode {document}: {reason}")]
    DocumentDecode { document: String, reason: String },

    /// A single document exceeded its analysis budget.
    #[error("Analysis of {document} timed out after {seconds}s")]
    Timeout { document: String, seconds: u64 },

    /// A required input or output path is not usable.
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl Error {
    /// Whether this error only affects a single document of a collection.
    pub fn is_document_scoped(&self) -> bool {
        !matches!(
            self,
            Error::MissingMetadata(_) | Error::NoDocuments(_) | Error::InvalidPath(_)
        )
    }
}
