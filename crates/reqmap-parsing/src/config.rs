use std::collections::BTreeMap;

use regex::Regex;

use reqmap_core::{DEFAULT_HEADING, RequirementKey};

use crate::classify::Cue;

/// How a user-supplied list combines with the built-in one.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    #[default]
    Default,
    /// Drop the built-in entries.
    Replace(Vec<T>),
    /// Keep the built-in entries and try these after them.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        let (base, extra) = match self {
            ListOverride::Default => (defaults, [].as_slice()),
            ListOverride::Replace(v) => ([].as_slice(), v.as_slice()),
            ListOverride::Extend(v) => (defaults, v.as_slice()),
        };
        base.iter().chain(extra).cloned().collect()
    }
}

/// A cue as written by the user, compiled in [`ParsingConfigBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueSpec {
    /// Must stand alone: no letter, digit or underscore on either side.
    Token(String),
    /// Free-standing regex, matched anywhere.
    Phrase(String),
}

/// Configuration for the sectioning and classification pipeline.
///
/// All regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── section.rs ──
    /// Multi-level numbered heading, e.g. `4.2.1 אחסון מזון`.
    pub(crate) numbered_heading_re: Option<Regex>,
    /// Short line of Hebrew letters, digits, spaces, parentheses and hyphens.
    pub(crate) plain_heading_re: Option<Regex>,
    /// Longest line (in characters) that can still be a heading.
    pub(crate) max_heading_chars: usize,
    /// Heading used for content before the first heading line.
    pub(crate) default_heading: String,
    /// Let an unnumbered heading directly follow another heading. Off by
    /// default: such a line is read as the first body line instead.
    pub(crate) stacked_plain_headings: bool,

    // ── classify.rs ──
    /// Cue overrides per category.
    pub(crate) cues: BTreeMap<RequirementKey, ListOverride<Cue>>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            numbered_heading_re: None,
            plain_heading_re: None,
            max_heading_chars: 80,
            default_heading: DEFAULT_HEADING.to_string(),
            stacked_plain_headings: false,
            cues: BTreeMap::new(),
        }
    }
}

impl ParsingConfig {
    pub fn max_heading_chars(&self) -> usize {
        self.max_heading_chars
    }

    pub fn default_heading(&self) -> &str {
        &self.default_heading
    }

    /// Cue override for `key`.
    pub(crate) fn cue_override(&self, key: RequirementKey) -> &ListOverride<Cue> {
        static DEFAULT: ListOverride<Cue> = ListOverride::Default;
        self.cues.get(&key).unwrap_or(&DEFAULT)
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    numbered_heading_re: Option<String>,
    plain_heading_re: Option<String>,
    max_heading_chars: Option<usize>,
    default_heading: Option<String>,
    stacked_plain_headings: Option<bool>,
    cues: BTreeMap<RequirementKey, ListOverride<CueSpec>>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Headings ──

    pub fn numbered_heading_regex(mut self, pattern: &str) -> Self {
        self.numbered_heading_re = Some(pattern.to_string());
        self
    }

    pub fn plain_heading_regex(mut self, pattern: &str) -> Self {
        self.plain_heading_re = Some(pattern.to_string());
        self
    }

    pub fn max_heading_chars(mut self, n: usize) -> Self {
        self.max_heading_chars = Some(n);
        self
    }

    pub fn default_heading(mut self, heading: &str) -> Self {
        self.default_heading = Some(heading.to_string());
        self
    }

    pub fn stacked_plain_headings(mut self, allow: bool) -> Self {
        self.stacked_plain_headings = Some(allow);
        self
    }

    // ── Category cues ──

    pub fn set_cues(mut self, key: RequirementKey, cues: Vec<CueSpec>) -> Self {
        self.cues.insert(key, ListOverride::Replace(cues));
        self
    }

    pub fn add_cue(mut self, key: RequirementKey, cue: CueSpec) -> Self {
        let entry = self.cues.entry(key).or_default();
        match entry {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(cue),
            ListOverride::Default => *entry = ListOverride::Extend(vec![cue]),
        }
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        let compile_cues = |specs: Vec<CueSpec>| -> Result<Vec<Cue>, regex::Error> {
            specs.iter().map(Cue::compile).collect()
        };

        let mut cues = BTreeMap::new();
        for (key, over) in self.cues {
            let compiled = match over {
                ListOverride::Default => ListOverride::Default,
                ListOverride::Replace(specs) => ListOverride::Replace(compile_cues(specs)?),
                ListOverride::Extend(specs) => ListOverride::Extend(compile_cues(specs)?),
            };
            cues.insert(key, compiled);
        }

        let defaults = ParsingConfig::default();
        Ok(ParsingConfig {
            numbered_heading_re: compile(self.numbered_heading_re)?,
            plain_heading_re: compile(self.plain_heading_re)?,
            max_heading_chars: self.max_heading_chars.unwrap_or(defaults.max_heading_chars),
            default_heading: self.default_heading.unwrap_or(defaults.default_heading),
            stacked_plain_headings: self
                .stacked_plain_headings
                .unwrap_or(defaults.stacked_plain_headings),
            cues,
        })
    }
}
