use std::path::Path;

use reqmap_core::{ClassifiedSection, ParsedDocument, Section, TextExtractor};

use crate::ParsingError;
use crate::bidi::DisplayRepairer;
use crate::classify::{CategoryTable, Classifier, SectionScores};
use crate::config::ParsingConfig;
use crate::section::Segmenter;

/// The sectioning-and-classification pipeline.
///
/// Owns its [`Segmenter`] and [`Classifier`]; both are immutable once
/// built, so one parser can serve any number of documents, from any number
/// of threads.
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    segmenter: Segmenter,
    classifier: Classifier,
}

impl DocumentParser {
    /// Default patterns, bidi repair if compiled in.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParsingConfig, repairer: DisplayRepairer) -> Self {
        let classifier = Classifier::new(CategoryTable::from_config(&config));
        Self {
            segmenter: Segmenter::new(config, repairer),
            classifier,
        }
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Split document text into sections (steps 2–3).
    pub fn sections(&self, text: &str) -> Vec<Section> {
        self.segmenter.segment(text)
    }

    /// Score one section against every category.
    pub fn score(&self, section: &Section) -> SectionScores {
        self.classifier.score_section(section)
    }

    /// Run sectioning and classification on already-extracted text.
    pub fn classify_text(&self, text: &str) -> Vec<ClassifiedSection> {
        let sections = self.sections(text);
        let classified = self.classifier.classify(&sections);
        tracing::info!(
            sections = sections.len(),
            classified = classified.len(),
            "classified document sections"
        );
        classified
    }

    /// Run the full pipeline on a document file.
    pub fn parse_document(
        &self,
        path: &Path,
        extractor: &dyn TextExtractor,
    ) -> Result<ParsedDocument, ParsingError> {
        let text = extractor.extract_text(path)?;
        tracing::debug!(path = %path.display(), chars = text.chars().count(), "extracted text");
        Ok(ParsedDocument {
            source_file: path.display().to_string(),
            parsed: self.classify_text(&text),
        })
    }
}
