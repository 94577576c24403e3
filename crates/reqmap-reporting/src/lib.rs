//! The JSON artifact handed to the report generator.
//!
//! ```json
//! {
//!   "source_file": "18-07-2022_4.2A.pdf",
//!   "parsed": [
//!     { "key": "gas_usage", "heading": "...", "context": "..." }
//!   ]
//! }
//! ```

use std::io::Write;
use std::path::Path;

use thiserror::Error;

pub use reqmap_core::ParsedDocument;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to replace report file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Serialize `doc` as pretty JSON (two-space indent, non-ASCII kept literal).
pub fn render_report(doc: &ParsedDocument) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Write `doc` to `path`, replacing any existing file.
///
/// The JSON goes to a temporary file next to `path` first and is then
/// renamed over it, so readers never see a half-written artifact.
pub fn write_report(path: &Path, doc: &ParsedDocument) -> Result<(), ReportError> {
    let json = render_report(doc)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    tracing::info!(
        path = %path.display(),
        sections = doc.parsed.len(),
        "wrote report"
    );
    Ok(())
}

/// Load a previously written artifact.
pub fn read_report(path: &Path) -> Result<ParsedDocument, ReportError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
