// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Malformed issue: {0}")]
    MalformedIssue(String),

    #[error("Severity out of range: {0} (expected 1-4)")]
    InvalidSeverity(u8),

    #[error("Unknown WCAG level: {0}")]
    InvalidLevel(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Attaches a path to an I/O failure.
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        EngineError::Io {
            source,
            path: path.into(),
        }
    }
}

// Allow `?` on std::io::Error by converting to EngineError::Io with unknown path.
impl From<std::io::Error> for EngineError {
    fn from(source: std::io::Error) -> Self {
        EngineError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

/// Names the JSON kind of a value for error messages.
#[must_use]
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
