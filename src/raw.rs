// src/raw.rs
//! Tool-specific input records.
//!
//! Scanner adapters hand over loosely shaped JSON. [`RawIssue`] narrows one
//! finding to a fixed set of optional fields; secondary keys that only some
//! tools emit (`rule`, `id`, `html`, ...) are read leniently so an odd value
//! there never rejects the whole record. Primary text keys with the wrong
//! JSON type do reject it, and the caller logs and skips that item.

use crate::error::{json_kind, EngineError, Result};
use crate::severity::SeverityInput;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// One finding as emitted by a scanner adapter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIssue {
    pub message: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "severity_field")]
    pub severity: SeverityInput,
    #[serde(deserialize_with = "severity_field")]
    pub impact: SeverityInput,
    #[serde(deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    pub code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub rule: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub context: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub html: Option<String>,
    #[serde(deserialize_with = "selector_field")]
    pub selector: Option<String>,
    #[serde(deserialize_with = "wcag_field")]
    pub wcag: Vec<WcagEntry>,
    pub remediation_steps: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_string")]
    pub tool: Option<String>,
}

/// An element of a raw `wcag` list.
#[derive(Debug, Clone, PartialEq)]
pub enum WcagEntry {
    Id(String),
    Structured(StructuredRef),
}

/// A criterion reference some tools emit with metadata attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredRef {
    pub id: String,
    pub level: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub techniques: Vec<String>,
    pub failures: Vec<String>,
}

impl RawIssue {
    /// Parses one raw item. Non-objects and wrongly typed primary fields are
    /// errors; the caller decides whether to skip.
    ///
    /// # Errors
    /// Returns `NotAnObject` or `MalformedIssue`.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(EngineError::NotAnObject {
                found: json_kind(value),
            });
        }
        Self::deserialize(value).map_err(|e| EngineError::MalformedIssue(e.to_string()))
    }

    /// `message`, else `description`; the first non-empty one wins.
    #[must_use]
    pub fn text(&self) -> &str {
        [self.message.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or("")
    }

    /// The most specific severity source this record carries.
    #[must_use]
    pub fn severity_source(&self) -> SeverityInput {
        if !self.severity.is_missing() {
            return self.severity.clone();
        }
        if !self.impact.is_missing() {
            return self.impact.clone();
        }
        self.score.map_or(SeverityInput::Missing, SeverityInput::Score)
    }
}

impl StructuredRef {
    fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let id = map.get("id").and_then(Value::as_str)?.trim().to_string();
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id,
            level: string_at(map, "level"),
            description: string_at(map, "description"),
            url: string_at(map, "url"),
            techniques: strings_at(map, "techniques"),
            failures: strings_at(map, "failures"),
        })
    }
}

/// Extracts the raw issue items from one tool's result container.
///
/// Accepts `results` as a list or as `{issues: [...]}`, a top-level `issues`
/// list, or a bare list. Anything else yields nothing.
#[must_use]
pub fn container_items<'a>(container: &'a Value, tool: &str) -> &'a [Value] {
    if let Value::Array(items) = container {
        return items.as_slice();
    }
    let Value::Object(map) = container else {
        warn!(tool, found = json_kind(container), "tool result is not an object, skipping");
        return &[];
    };

    if map.get("status").and_then(Value::as_str) == Some("error") {
        let reason = map.get("error").and_then(Value::as_str).unwrap_or("no error message");
        warn!(tool, reason, "tool reported an error status");
    }

    let items = match map.get("results") {
        Some(Value::Array(items)) => Some(items),
        Some(Value::Object(inner)) => inner.get("issues").and_then(Value::as_array),
        _ => None,
    }
    .or_else(|| map.get("issues").and_then(Value::as_array));

    match items {
        Some(items) => {
            debug!(tool, count = items.len(), "read tool results");
            items.as_slice()
        }
        None => {
            debug!(tool, "tool result carries no issue list");
            &[]
        }
    }
}

fn string_at(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn strings_at(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

type FieldResult<T, E> = std::result::Result<T, E>;

fn severity_field<'de, D: Deserializer<'de>>(d: D) -> FieldResult<SeverityInput, D::Error> {
    Ok(SeverityInput::from(&Value::deserialize(d)?))
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> FieldResult<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> FieldResult<Option<f64>, D::Error> {
    Ok(Value::deserialize(d)?.as_f64())
}

// axe reports selectors as a target path list.
fn selector_field<'de, D: Deserializer<'de>>(d: D) -> FieldResult<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Array(parts) => {
            let parts: Vec<&str> = parts.iter().filter_map(Value::as_str).collect();
            Some(parts.join(" "))
        }
        _ => None,
    })
}

fn wcag_field<'de, D: Deserializer<'de>>(d: D) -> FieldResult<Vec<WcagEntry>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => vec![WcagEntry::Id(s)],
        Value::Array(items) => items.iter().filter_map(wcag_entry).collect(),
        _ => Vec::new(),
    })
}

fn wcag_entry(value: &Value) -> Option<WcagEntry> {
    match value {
        Value::String(s) => Some(WcagEntry::Id(s.clone())),
        Value::Object(map) => StructuredRef::from_map(map).map(WcagEntry::Structured),
        _ => None,
    }
}
