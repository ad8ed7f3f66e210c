// src/severity.rs
//! Maps every tool's severity vocabulary onto [`Severity`].
//!
//! Normalization is total: anything unrecognized becomes `Moderate`.

use crate::types::Severity;
use serde_json::Value;

/// A severity value as it arrives from a scanner.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SeverityInput {
    /// Already canonical; returned unchanged.
    Canonical(Severity),
    /// Integer rank. Only 1-4 are meaningful.
    Int(i64),
    /// Confidence score in `[0, 1]` (lighthouse).
    Score(f64),
    Text(String),
    #[default]
    Missing,
    /// A JSON value of a type no tool uses for severity.
    Unsupported,
}

impl SeverityInput {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<Severity> for SeverityInput {
    fn from(severity: Severity) -> Self {
        Self::Canonical(severity)
    }
}

impl From<i64> for SeverityInput {
    fn from(rank: i64) -> Self {
        Self::Int(rank)
    }
}

impl From<f64> for SeverityInput {
    fn from(score: f64) -> Self {
        Self::Score(score)
    }
}

impl From<&str> for SeverityInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SeverityInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<T: Into<SeverityInput>> From<Option<T>> for SeverityInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

impl From<&Value> for SeverityInput {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::String(s) => Self::Text(s.clone()),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(rank), _) => Self::Int(rank),
                (None, Some(score)) => Self::Score(score),
                (None, None) => Self::Unsupported,
            },
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => Self::Unsupported,
        }
    }
}

/// Normalizes any severity representation. Never fails.
#[must_use]
pub fn normalize(raw: &SeverityInput) -> Severity {
    match raw {
        SeverityInput::Canonical(severity) => *severity,
        SeverityInput::Int(rank) => u8::try_from(*rank)
            .ok()
            .and_then(Severity::from_rank)
            .unwrap_or(Severity::Moderate),
        SeverityInput::Score(score) => from_score(*score),
        SeverityInput::Text(text) => from_label(text).unwrap_or(Severity::Moderate),
        SeverityInput::Missing | SeverityInput::Unsupported => Severity::Moderate,
    }
}

/// Fixed case-insensitive vocabulary shared by axe, pa11y and the markup
/// analyzer.
#[must_use]
pub fn from_label(label: &str) -> Option<Severity> {
    match label.trim().to_ascii_lowercase().as_str() {
        "critical" | "error" => Some(Severity::Critical),
        "serious" | "warning" => Some(Severity::Serious),
        "moderate" => Some(Severity::Moderate),
        "minor" | "notice" => Some(Severity::Minor),
        _ => None,
    }
}

/// Lighthouse-style audit score. Out-of-range and NaN scores default.
#[must_use]
pub fn from_score(score: f64) -> Severity {
    if !(0.0..=1.0).contains(&score) {
        return Severity::Moderate;
    }
    if score == 0.0 {
        Severity::Critical
    } else if score < 0.5 {
        Severity::Serious
    } else if score < 0.9 {
        Severity::Moderate
    } else {
        Severity::Minor
    }
}
