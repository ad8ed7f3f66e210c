// src/catalog.rs
//! Optional WCAG criterion catalog.
//!
//! Loaded from a JSON array of criteria. Provides the level and description
//! for criterion ids that tools report bare, and maps tool-specific rule
//! codes (`image-alt`, `wcag111`) to criterion ids.

use crate::error::{EngineError, Result};
use crate::types::{WcagLevel, WcagReference};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// One criterion as stored in the catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CriterionEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub tool_codes: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub failures: Vec<String>,
    #[serde(default)]
    pub understanding_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_id: HashMap<String, CriterionEntry>,
    // lowercase tool code -> criterion id
    by_code: HashMap<String, String>,
}

impl Catalog {
    /// Parses a catalog document.
    ///
    /// # Errors
    /// Returns error if the document is not a JSON array of criteria.
    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<CriterionEntry> = serde_json::from_str(content)?;
        Ok(Self::from_entries(entries))
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| EngineError::io(e, path))?;
        let catalog = Self::from_json(&content)?;
        info!(path = %path.display(), criteria = catalog.len(), "loaded WCAG catalog");
        Ok(catalog)
    }

    #[must_use]
    pub fn from_entries(entries: Vec<CriterionEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            let id = entry.id.trim().to_string();
            if id.is_empty() {
                warn!("catalog entry without id ignored");
                continue;
            }
            for code in &entry.tool_codes {
                catalog.by_code.insert(code.to_lowercase(), id.clone());
            }
            catalog.by_id.insert(id, entry);
        }
        catalog
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CriterionEntry> {
        self.by_id.get(id)
    }

    /// Finds the criterion a tool-specific code maps to (case-insensitive).
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&CriterionEntry> {
        let id = self.by_code.get(&code.trim().to_lowercase())?;
        self.by_id.get(id)
    }

    /// A fully populated reference for `id`, if the catalog knows it.
    #[must_use]
    pub fn reference(&self, id: &str) -> Option<WcagReference> {
        let entry = self.get(id)?;
        let level = WcagLevel::parse(&entry.level).unwrap_or_else(|| {
            debug!(id, level = %entry.level, "catalog level unrecognized, using A");
            WcagLevel::A
        });
        let description = if entry.description.is_empty() {
            entry.title.clone()
        } else {
            entry.description.clone()
        };
        Some(WcagReference {
            criterion_id: entry.id.clone(),
            level,
            description,
            url: entry.understanding_url.clone(),
            techniques: entry.techniques.clone(),
            failures: entry.failures.clone(),
        })
    }
}
