use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default file whose `in Resources` references are stripped.
pub const DEFAULT_RESOURCE_FILE: &str = "Info.plist";

/// Default file whose duplicate `in Sources` references are collapsed.
pub const DEFAULT_SOURCE_FILE: &str = "MarketComponents.swift";

/// Role annotation matched by the resource pass.
pub const RESOURCES_ROLE: &str = "Resources";

/// Role annotation matched by the source pass.
pub const SOURCES_ROLE: &str = "Sources";

/// Which duplicate `in Sources` references are removed when a file is
/// registered more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Remove the first occurrence only, leaving every later one in place.
    #[default]
    RemoveFirst,
    /// Remove every occurrence except the last.
    KeepLast,
    /// Remove every occurrence except the first.
    KeepFirst,
}

impl TieBreak {
    pub const ALL: [TieBreak; 3] = [TieBreak::RemoveFirst, TieBreak::KeepLast, TieBreak::KeepFirst];

    pub fn as_str(self) -> &'static str {
        match self {
            TieBreak::RemoveFirst => "remove-first",
            TieBreak::KeepLast => "keep-last",
            TieBreak::KeepFirst => "keep-first",
        }
    }

    /// Indices (in document order) of the occurrences to drop, given `found` matches.
    pub fn removals(self, found: usize) -> Vec<usize> {
        if found < 2 {
            return vec![];
        }
        match self {
            TieBreak::RemoveFirst => vec![0],
            TieBreak::KeepLast => (0..found - 1).collect(),
            TieBreak::KeepFirst => (1..found).collect(),
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TieBreak::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown tie-break '{}' (expected one of: remove-first, keep-last, keep-first)",
                    s
                )
            })
    }
}

/// Pass A: drop stray `<file> in Resources` build-file lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRule {
    pub file_name: String,
}

impl Default for ResourceRule {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_RESOURCE_FILE.to_string(),
        }
    }
}

/// Pass B: collapse duplicate `<file> in Sources` registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRule {
    pub file_name: String,
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl Default for SourceRule {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_SOURCE_FILE.to_string(),
            tie_break: TieBreak::default(),
        }
    }
}

/// The full rule set applied to a manifest, in order: resource pass, then source pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRules {
    pub resource: ResourceRule,
    pub source: SourceRule,
}
