use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Match, Regex};

use reqmap_core::{ClassifiedSection, RequirementKey, Section};

use crate::config::{CueSpec, ParsingConfig};

/// Flags applied to every cue pattern.
const CUE_FLAGS: &str = "(?im)";

/// Built-in cues per category, in the order they are tried.
static DEFAULT_CUES: Lazy<BTreeMap<RequirementKey, Vec<Cue>>> = Lazy::new(|| {
    let compile = |specs: &[CueSpec]| -> Vec<Cue> {
        specs.iter().map(|s| Cue::compile(s).unwrap()).collect()
    };
    let token = |s: &str| CueSpec::Token(s.to_string());
    let phrase = |s: &str| CueSpec::Phrase(s.to_string());

    BTreeMap::from([
        (
            RequirementKey::GasUsage,
            compile(&[
                token("גז"),
                phrase(r"מערכת\s+גז"),
                phrase(r#"גפ"מ"#),
                phrase(r"תשתית\s+גז"),
            ]),
        ),
        (
            RequirementKey::MeatService,
            compile(&[
                token("בשר"),
                token("עופות"),
                token("דגים"),
                phrase(r"אחסון\s+בשר"),
                phrase(r"הפרדה\s+(?:בשרי|בשר\s*.*?חלבי|דגים)"),
            ]),
        ),
        (
            RequirementKey::Seating,
            compile(&[
                phrase(r"מקומות\s+ישיבה"),
                phrase(r"קיבולת(?:\s+קהל)?\s+מקסימלית"),
                phrase(r"תפוסה\s+מותרת"),
            ]),
        ),
    ])
});

/// Characters that glue a token to its neighbours.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ('\u{0590}'..='\u{05FF}').contains(&c)
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| at + c.len_utf8())
}

/// One lexical cue of a category.
#[derive(Debug, Clone)]
pub enum Cue {
    /// Counts only when not preceded or followed by a word character, so a
    /// short Hebrew token does not fire inside a longer word.
    Bounded(Regex),
    /// Counts wherever it matches.
    Phrase(Regex),
}

impl Cue {
    pub fn compile(spec: &CueSpec) -> Result<Self, regex::Error> {
        match spec {
            CueSpec::Token(p) => Ok(Cue::Bounded(Regex::new(&format!("{CUE_FLAGS}{p}"))?)),
            CueSpec::Phrase(p) => Ok(Cue::Phrase(Regex::new(&format!("{CUE_FLAGS}{p}"))?)),
        }
    }

    pub fn regex(&self) -> &Regex {
        match self {
            Cue::Bounded(re) | Cue::Phrase(re) => re,
        }
    }

    fn accepts(&self, text: &str, m: &Match<'_>) -> bool {
        match self {
            Cue::Phrase(_) => true,
            Cue::Bounded(_) => {
                let before = text[..m.start()].chars().next_back();
                let after = text[m.end()..].chars().next();
                !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
            }
        }
    }
}

/// The cues of one requirement category.
#[derive(Debug, Clone)]
pub struct CategoryPattern {
    pub key: RequirementKey,
    pub cues: Vec<Cue>,
}

impl CategoryPattern {
    /// Count non-overlapping cue hits in `text`.
    ///
    /// The cues behave like one alternation: scanning left to right, at each
    /// position the cues are tried in order and the first one that matches
    /// there (and passes its boundary check) is counted and consumed.
    pub fn count_matches(&self, text: &str) -> usize {
        let mut next: Vec<Option<Match<'_>>> =
            self.cues.iter().map(|c| c.regex().find(text)).collect();
        let mut pos = 0;
        let mut count = 0;

        while pos <= text.len() {
            for (cue, slot) in self.cues.iter().zip(next.iter_mut()) {
                if slot.is_some_and(|m| m.start() < pos) {
                    *slot = cue.regex().find_at(text, pos);
                }
            }

            let Some(start) = next.iter().flatten().map(|m| m.start()).min() else {
                break;
            };

            let accepted = self
                .cues
                .iter()
                .zip(next.iter())
                .find_map(|(cue, slot)| {
                    slot.filter(|m| m.start() == start && cue.accepts(text, m))
                });

            match accepted {
                Some(m) => {
                    count += 1;
                    pos = if m.end() > m.start() {
                        m.end()
                    } else {
                        next_char_boundary(text, m.end())
                    };
                }
                None => {
                    // Every cue starting here was rejected; retry them one character later.
                    let retry = next_char_boundary(text, start);
                    for (cue, slot) in self.cues.iter().zip(next.iter_mut()) {
                        if slot.is_some_and(|m| m.start() == start) {
                            *slot = if retry <= text.len() {
                                cue.regex().find_at(text, retry)
                            } else {
                                None
                            };
                        }
                    }
                }
            }
        }

        count
    }
}

/// Immutable set of category patterns, one per [`RequirementKey`].
#[derive(Debug, Clone)]
pub struct CategoryTable {
    patterns: Vec<CategoryPattern>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::from_config(&ParsingConfig::default())
    }
}

impl CategoryTable {
    /// Resolve each category's cue override against the built-in cues.
    pub fn from_config(config: &ParsingConfig) -> Self {
        let patterns = RequirementKey::ALL
            .into_iter()
            .map(|key| {
                let defaults = DEFAULT_CUES.get(&key).map(Vec::as_slice).unwrap_or(&[]);
                CategoryPattern {
                    key,
                    cues: config.cue_override(key).resolve(defaults),
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn patterns(&self) -> &[CategoryPattern] {
        &self.patterns
    }
}

/// Per-category hit counts for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionScores {
    scores: Vec<(RequirementKey, usize)>,
}

impl SectionScores {
    pub fn get(&self, key: RequirementKey) -> usize {
        self.scores
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0, |(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RequirementKey, usize)> + '_ {
        self.scores.iter().copied()
    }

    /// Highest-scoring category; the earliest key wins a tie.
    pub fn best(&self) -> Option<(RequirementKey, usize)> {
        self.scores
            .iter()
            .copied()
            .fold(None, |best, (k, s)| match best {
                Some((_, bs)) if bs >= s => best,
                _ => Some((k, s)),
            })
    }

    /// The best category, if it beats every other category combined.
    pub fn verdict(&self) -> Option<RequirementKey> {
        let (best_key, best_score) = self.best()?;
        let others: usize = self
            .scores
            .iter()
            .filter(|(k, _)| *k != best_key)
            .map(|(_, s)| s)
            .sum();
        (best_score > 0 && best_score > others).then_some(best_key)
    }
}

/// Maps sections to requirement categories, favouring precision: a section
/// is only kept when one category clearly dominates.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    table: CategoryTable,
}

impl Classifier {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Count cue hits in both the raw and the display text and sum them.
    pub fn score_section(&self, section: &Section) -> SectionScores {
        let scores = self
            .table
            .patterns
            .iter()
            .map(|p| {
                let score = p.count_matches(&section.raw) + p.count_matches(&section.text);
                (p.key, score)
            })
            .collect();
        SectionScores { scores }
    }

    pub fn classify_section(&self, section: &Section) -> Option<ClassifiedSection> {
        let scores = self.score_section(section);
        match scores.verdict() {
            Some(key) => Some(ClassifiedSection {
                key,
                heading: section.heading.clone(),
                context: section.text.clone(),
            }),
            None => {
                tracing::trace!(heading = %section.heading, ?scores, "section left unclassified");
                None
            }
        }
    }

    /// Classify every section, dropping the ambiguous and unmatched ones.
    pub fn classify(&self, sections: &[Section]) -> Vec<ClassifiedSection> {
        sections
            .iter()
            .filter_map(|s| self.classify_section(s))
            .collect()
    }
}
