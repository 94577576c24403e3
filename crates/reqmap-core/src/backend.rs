use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("{0} is not available")]
    CapabilityUnavailable(&'static str),
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document text extraction backends.
///
/// Implementors turn a container file (PDF, DOCX, ...) into raw Unicode
/// text; sectioning and classification live in
/// `reqmap_parsing::DocumentParser`.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text content of a document.
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError>;
}
