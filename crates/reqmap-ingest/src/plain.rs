use std::path::Path;

use reqmap_core::{ExtractionError, TextExtractor};

/// Reads text that was extracted ahead of time (UTF-8 `.txt`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| ExtractionError::Malformed(format!("{}: {}", path.display(), e)))
    }
}
