use std::path::Path;

use thiserror::Error;

pub mod bidi;
pub mod classify;
pub mod config;
pub mod normalize;
pub mod parser;
pub mod section;

pub use bidi::{DisplayReorder, DisplayRepairer, HebrewRunReorder, ReorderError};
pub use classify::{CategoryPattern, CategoryTable, Classifier, Cue, SectionScores};
pub use config::{CueSpec, ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use normalize::normalize_text;
pub use parser::DocumentParser;
pub use section::{HeadingKind, Segmenter};
// Re-export domain types from core (canonical definitions live there)
pub use reqmap_core::{
    ClassifiedSection, ExtractionError, ParsedDocument, RequirementKey, Section, TextExtractor,
};

#[cfg(feature = "bidi")]
pub use bidi::UnicodeBidiReorder;

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("extraction error: {0}")]
    Extraction(#[from] reqmap_core::ExtractionError),
}

/// Map a regulatory document to requirement categories, using the given
/// extractor for the text.
///
/// Pipeline:
/// 1. Extract raw text via `extractor`
/// 2. Normalize and split into heading-delimited sections
/// 3. Repair RTL display order of headings and bodies
/// 4. Keep the sections one category clearly dominates
pub fn parse_document(
    path: &Path,
    extractor: &dyn TextExtractor,
) -> Result<ParsedDocument, ParsingError> {
    DocumentParser::new().parse_document(path, extractor)
}
