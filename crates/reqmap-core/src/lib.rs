use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;

// Re-export for convenience
pub use backend::{ExtractionError, TextExtractor};

/// Heading given to content that appears before the first heading line.
pub const DEFAULT_HEADING: &str = "Introduction";

/// Business-requirement category a section can be mapped to.
///
/// This is a closed enumeration: adding a category means adding its cue
/// patterns in `reqmap-parsing` and updating every consumer of the JSON
/// artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKey {
    GasUsage,
    MeatService,
    Seating,
}

impl RequirementKey {
    /// Every key, in declaration order.
    pub const ALL: [RequirementKey; 3] = [Self::GasUsage, Self::MeatService, Self::Seating];

    /// Wire name used in the persisted artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GasUsage => "gas_usage",
            Self::MeatService => "meat_service",
            Self::Seating => "seating",
        }
    }
}

impl fmt::Display for RequirementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown requirement key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for RequirementKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// A heading-delimited slice of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading line, repaired for display.
    pub heading: String,
    /// Body, repaired for display.
    pub text: String,
    /// Body after normalization only. Pattern matching runs on this since
    /// display repair can change substring adjacency.
    pub raw: String,
}

/// A section mapped to exactly one requirement category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedSection {
    pub key: RequirementKey,
    pub heading: String,
    /// Repaired (display) body of the section.
    pub context: String,
}

/// The persisted result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub source_file: String,
    pub parsed: Vec<ClassifiedSection>,
}

impl ParsedDocument {
    /// Number of classified sections per category, in [`RequirementKey::ALL`] order.
    pub fn counts(&self) -> Vec<(RequirementKey, usize)> {
        RequirementKey::ALL
            .into_iter()
            .map(|k| (k, self.parsed.iter().filter(|s| s.key == k).count()))
            .collect()
    }
}
