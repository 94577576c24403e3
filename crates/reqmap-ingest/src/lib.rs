use std::path::{Path, PathBuf};

use thiserror::Error;

#[cfg(feature = "docx")]
pub mod docx;
pub mod plain;

pub use reqmap_core::{ExtractionError, ParsedDocument, TextExtractor};
#[cfg(feature = "docx")]
pub use docx::DocxExtractor;
pub use plain::PlainTextExtractor;

/// Input files tried, in order, when none are given.
pub const DEFAULT_INPUTS: [&str; 2] = ["18-07-2022_4.2A.pdf", "18-07-2022_4.2A.docx"];

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("no input document found (looked for: {})", .0.join(", "))]
    NotFound(Vec<String>),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Parsing(#[from] reqmap_parsing::ParsingError),
}

/// Container formats we can pull text out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Pick the extractor for `path` based on its extension.
///
/// - `.pdf` → MuPDF backend (requires `pdf` feature)
/// - `.docx` → zip + WordprocessingML reader (requires `docx` feature)
/// - `.txt` → read as UTF-8
pub fn extractor_for(path: &Path) -> Result<Box<dyn TextExtractor>, ExtractionError> {
    match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Pdf) => pdf_extractor(),
        Some(DocumentFormat::Docx) => docx_extractor(),
        Some(DocumentFormat::PlainText) => Ok(Box::new(PlainTextExtractor)),
        None => Err(ExtractionError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Extract the raw text of a PDF, DOCX or TXT file.
pub fn extract_text(path: &Path) -> Result<String, IngestError> {
    let extractor = extractor_for(path)?;
    Ok(extractor.extract_text(path)?)
}

/// Extract, section and classify `path` with `parser`.
pub fn parse_path(
    path: &Path,
    parser: &reqmap_parsing::DocumentParser,
) -> Result<ParsedDocument, IngestError> {
    let extractor = extractor_for(path)?;
    Ok(parser.parse_document(path, extractor.as_ref())?)
}

/// Return the first candidate that exists as a file and has a format we
/// can read.
pub fn locate_input<P: AsRef<Path>>(candidates: &[P]) -> Result<PathBuf, IngestError> {
    for candidate in candidates {
        let path = candidate.as_ref();
        if !path.is_file() {
            continue;
        }
        if DocumentFormat::from_path(path).is_none() {
            tracing::warn!(path = %path.display(), "skipping input with unsupported extension");
            continue;
        }
        tracing::debug!(path = %path.display(), "located input document");
        return Ok(path.to_path_buf());
    }

    Err(IngestError::NotFound(
        candidates
            .iter()
            .map(|c| c.as_ref().display().to_string())
            .collect(),
    ))
}

#[cfg(feature = "pdf")]
fn pdf_extractor() -> Result<Box<dyn TextExtractor>, ExtractionError> {
    Ok(Box::new(reqmap_pdf_mupdf::MupdfBackend::default()))
}

#[cfg(not(feature = "pdf"))]
fn pdf_extractor() -> Result<Box<dyn TextExtractor>, ExtractionError> {
    Err(ExtractionError::CapabilityUnavailable(
        "PDF reader (enable the `pdf` feature of reqmap-ingest)",
    ))
}

#[cfg(feature = "docx")]
fn docx_extractor() -> Result<Box<dyn TextExtractor>, ExtractionError> {
    Ok(Box::new(DocxExtractor))
}

#[cfg(not(feature = "docx"))]
fn docx_extractor() -> Result<Box<dyn TextExtractor>, ExtractionError> {
    Err(ExtractionError::CapabilityUnavailable(
        "DOCX reader (enable the `docx` feature of reqmap-ingest)",
    ))
}
