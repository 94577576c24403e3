//! Visual-order repair for right-to-left (Hebrew) text.
//!
//! Text extracted from regulatory PDFs arrives in logical order. For display
//! it is reordered by a [`DisplayReorder`] strategy chosen once, when the
//! [`DisplayRepairer`] is built. The Hebrew-run reversal in
//! [`HebrewRunReorder`] is always available and backs up the primary
//! strategy whenever it reports an error.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::normalize::normalize_text;

/// Hebrew block, U+0590–U+05FF.
static HEBREW_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{0590}-\x{05FF}]+").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    #[error("no paragraphs resolved for a {0}-byte line")]
    NoParagraphs(usize),
    #[error("reordered line is {got} bytes, expected {expected}")]
    LengthMismatch { expected: usize, got: usize },
}

/// A strategy that turns logical-order text into display order.
pub trait DisplayReorder: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Reorder already-normalized text. Line breaks must be preserved.
    fn reorder(&self, text: &str) -> Result<String, ReorderError>;
}

/// Reverses every maximal run of Hebrew-block characters in place.
///
/// Digits, Latin text and punctuation keep their positions, so this is an
/// approximation of the bidi algorithm that is right for the common case of
/// Hebrew words around numbers on an otherwise logical-order line.
#[derive(Debug, Clone, Copy, Default)]
pub struct HebrewRunReorder;

impl HebrewRunReorder {
    pub fn reverse_runs(&self, text: &str) -> String {
        HEBREW_RUN
            .replace_all(text, |caps: &regex::Captures<'_>| {
                caps[0].chars().rev().collect::<String>()
            })
            .into_owned()
    }
}

impl DisplayReorder for HebrewRunReorder {
    fn name(&self) -> &'static str {
        "hebrew-runs"
    }

    fn reorder(&self, text: &str) -> Result<String, ReorderError> {
        Ok(self.reverse_runs(text))
    }
}

/// Unicode Bidirectional Algorithm (UAX #9), applied line by line with the
/// base direction taken from the first strong character.
#[cfg(feature = "bidi")]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeBidiReorder;

#[cfg(feature = "bidi")]
impl DisplayReorder for UnicodeBidiReorder {
    fn name(&self) -> &'static str {
        "unicode-bidi"
    }

    fn reorder(&self, text: &str) -> Result<String, ReorderError> {
        let mut lines = Vec::new();
        for line in text.split('\n') {
            if line.is_empty() {
                lines.push(String::new());
                continue;
            }

            let info = unicode_bidi::BidiInfo::new(line, None);
            if info.paragraphs.is_empty() {
                return Err(ReorderError::NoParagraphs(line.len()));
            }

            let visual: String = info
                .paragraphs
                .iter()
                .map(|para| info.reorder_line(para, para.range.clone()))
                .collect();
            if visual.len() != line.len() {
                return Err(ReorderError::LengthMismatch {
                    expected: line.len(),
                    got: visual.len(),
                });
            }
            lines.push(visual);
        }
        Ok(lines.join("\n"))
    }
}

/// Display-order repair with a fixed primary strategy and the Hebrew-run
/// fallback.
#[derive(Clone)]
pub struct DisplayRepairer {
    primary: Option<Arc<dyn DisplayReorder>>,
    fallback: HebrewRunReorder,
}

impl Default for DisplayRepairer {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Debug for DisplayRepairer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayRepairer")
            .field("primary", &self.primary.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl DisplayRepairer {
    /// Use the bidi algorithm when it is compiled in, the run reversal otherwise.
    pub fn detect() -> Self {
        #[cfg(feature = "bidi")]
        {
            Self::with_primary(Arc::new(UnicodeBidiReorder))
        }
        #[cfg(not(feature = "bidi"))]
        {
            Self::fallback_only()
        }
    }

    /// Never consult a primary strategy.
    pub fn fallback_only() -> Self {
        Self {
            primary: None,
            fallback: HebrewRunReorder,
        }
    }

    pub fn with_primary(primary: Arc<dyn DisplayReorder>) -> Self {
        Self {
            primary: Some(primary),
            fallback: HebrewRunReorder,
        }
    }

    /// Name of the strategy tried first.
    pub fn strategy_name(&self) -> &'static str {
        self.primary
            .as_ref()
            .map_or(self.fallback.name(), |p| p.name())
    }

    /// Normalize `s` and put it into display order. Never fails.
    pub fn fix_display_order(&self, s: &str) -> String {
        let normalized = normalize_text(s);
        if let Some(primary) = &self.primary {
            match primary.reorder(&normalized) {
                Ok(visual) => return visual,
                Err(e) => {
                    tracing::debug!(
                        strategy = primary.name(),
                        error = %e,
                        "display reorder failed, using fallback"
                    );
                }
            }
        }
        self.fallback.reverse_runs(&normalized)
    }
}
