use once_cell::sync::Lazy;
use regex::Regex;

use reqmap_core::Section;

use crate::bidi::DisplayRepairer;
use crate::config::ParsingConfig;
use crate::normalize::normalize_text;

/// `4.2 כללי`, `1.3.7 אחסון מזון`: dotted numbering followed by text.
static NUMBERED_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)+\s+.+$").unwrap());

/// Hebrew letters, digits, spaces, parentheses and hyphens, optionally
/// closed by a colon: `הוראות כלליות:`, `פרק 3 (תברואה)`.
static PLAIN_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\x{05D0}-\x{05EA}0-9\s()\-]{3,}:?$").unwrap());

/// Shape of a heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingKind {
    Numbered,
    Plain,
}

/// Splits normalized document text into heading-delimited [`Section`]s.
///
/// Headings are kept unrepaired while a section is open and only passed
/// through display repair when the section is emitted.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: ParsingConfig,
    repairer: DisplayRepairer,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(ParsingConfig::default(), DisplayRepairer::detect())
    }
}

impl Segmenter {
    pub fn new(config: ParsingConfig, repairer: DisplayRepairer) -> Self {
        Self { config, repairer }
    }

    pub fn repairer(&self) -> &DisplayRepairer {
        &self.repairer
    }

    /// Classify a single trimmed line as a heading shape, if it is one.
    pub fn heading_kind(&self, line: &str) -> Option<HeadingKind> {
        if line.chars().count() > self.config.max_heading_chars {
            return None;
        }
        let numbered = self
            .config
            .numbered_heading_re
            .as_ref()
            .unwrap_or(&NUMBERED_HEADING_RE);
        let plain = self
            .config
            .plain_heading_re
            .as_ref()
            .unwrap_or(&PLAIN_HEADING_RE);

        if numbered.is_match(line) {
            Some(HeadingKind::Numbered)
        } else if plain.is_match(line) {
            Some(HeadingKind::Plain)
        } else {
            None
        }
    }

    /// Partition `full_text` into sections in document order.
    ///
    /// Blank lines are dropped. A heading closes the open section only if it
    /// has body lines, so consecutive headings never yield empty sections.
    /// Unless `stacked_plain_headings` is set, an unnumbered heading line
    /// directly after a numbered heading is read as body text.
    pub fn segment(&self, full_text: &str) -> Vec<Section> {
        let normalized = normalize_text(full_text);
        let mut sections = Vec::new();

        let mut current_heading = self.config.default_heading.clone();
        let mut open_kind: Option<HeadingKind> = None;
        let mut buffer: Vec<&str> = Vec::new();

        for line in normalized.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let kind = self.heading_kind(line).filter(|kind| match kind {
                HeadingKind::Numbered => true,
                HeadingKind::Plain => {
                    self.config.stacked_plain_headings
                        || open_kind != Some(HeadingKind::Numbered)
                        || !buffer.is_empty()
                }
            });

            if let Some(kind) = kind {
                if !buffer.is_empty() {
                    sections.push(self.emit(&current_heading, &buffer));
                    buffer.clear();
                }
                current_heading = line.to_string();
                open_kind = Some(kind);
            } else {
                buffer.push(line);
            }
        }

        if !buffer.is_empty() {
            sections.push(self.emit(&current_heading, &buffer));
        }

        tracing::debug!(
            sections = sections.len(),
            strategy = self.repairer.strategy_name(),
            "segmented document"
        );
        sections
    }

    fn emit(&self, heading: &str, body: &[&str]) -> Section {
        let raw = body.join("\n");
        Section {
            heading: self.repairer.fix_display_order(heading),
            text: self.repairer.fix_display_order(&raw),
            raw,
        }
    }
}
