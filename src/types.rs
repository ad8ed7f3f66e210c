// src/types.rs
//! Canonical data model shared by every stage of the engine.
//!
//! The dict form produced by serde is the wire format of the issue-list
//! artifact: `severity` is the integer rank, `type` and `wcag_references` are
//! renamed, and `tools` serializes as a sorted array.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Canonical 4-level severity. Lower rank is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Critical = 1,
    Serious = 2,
    Moderate = 3,
    Minor = 4,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Serious,
        Severity::Moderate,
        Severity::Minor,
    ];

    /// Returns the integer rank (1 = most severe).
    #[must_use]
    pub fn rank(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Self::Critical),
            2 => Some(Self::Serious),
            3 => Some(Self::Moderate),
            4 => Some(Self::Minor),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Serious => "serious",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.rank()
    }
}

impl TryFrom<u8> for Severity {
    type Error = EngineError;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        Self::from_rank(rank).ok_or(EngineError::InvalidSeverity(rank))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// WCAG conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    A,
    AA,
    AAA,
}

impl WcagLevel {
    pub const ALL: [WcagLevel; 3] = [WcagLevel::A, WcagLevel::AA, WcagLevel::AAA];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AA => "AA",
            Self::AAA => "AAA",
        }
    }

    /// Case-insensitive lookup; anything else is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "AA" => Some(Self::AA),
            "AAA" => Some(Self::AAA),
            _ => None,
        }
    }
}

impl FromStr for WcagLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| EngineError::InvalidLevel(s.to_string()))
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reference from an issue to one WCAG success criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcagReference {
    /// Dotted triple such as `1.1.1`.
    pub criterion_id: String,
    pub level: WcagLevel,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub failures: Vec<String>,
}

impl WcagReference {
    /// A bare reference: level A, no metadata.
    #[must_use]
    pub fn new(criterion_id: impl Into<String>) -> Self {
        Self::with_level(criterion_id, WcagLevel::A)
    }

    #[must_use]
    pub fn with_level(criterion_id: impl Into<String>, level: WcagLevel) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            level,
            description: String::new(),
            url: None,
            techniques: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// The principle digit (first character of the id), if any.
    #[must_use]
    pub fn principle(&self) -> Option<char> {
        self.criterion_id.chars().next()
    }
}

/// One accessibility finding, independent of the tool(s) that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    #[serde(rename = "wcag_references", default)]
    pub wcag_refs: Vec<WcagReference>,
    #[serde(default)]
    pub tools: BTreeSet<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub remediation_steps: Vec<String>,
    pub timestamp: String,
}

/// Identity used for cross-tool deduplication: exact string equality on
/// description, selector (empty when absent) and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueKey {
    pub description: String,
    pub selector: String,
    pub kind: String,
}

impl Issue {
    #[must_use]
    pub fn key(&self) -> IssueKey {
        IssueKey {
            description: self.description.clone(),
            selector: self.selector.clone().unwrap_or_default(),
            kind: self.kind.clone(),
        }
    }

    /// True if at least one reference sits at `level`.
    #[must_use]
    pub fn has_level(&self, level: WcagLevel) -> bool {
        self.wcag_refs.iter().any(|r| r.level == level)
    }

    /// Exact severity match and/or at least one reference at `level`.
    /// `None` matches everything.
    #[must_use]
    pub fn matches(&self, severity: Option<Severity>, level: Option<WcagLevel>) -> bool {
        severity.map_or(true, |s| self.severity == s) && level.map_or(true, |l| self.has_level(l))
    }

    #[must_use]
    pub fn criterion_ids(&self) -> Vec<&str> {
        self.wcag_refs.iter().map(|r| r.criterion_id.as_str()).collect()
    }

    #[must_use]
    pub fn reported_by(&self, tool: &str) -> bool {
        self.tools.contains(tool)
    }
}
