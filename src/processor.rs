// src/processor.rs
//! The engine facade.
//!
//! A [`Processor`] owns the retained issue list and the aggregate counters.
//! It is a plain value: callers that share one across scanners wrap it in a
//! lock ([`SharedProcessor`]) so writes are serialized. Malformed tool input
//! is logged and skipped here and never surfaces as an error.

use crate::catalog::Catalog;
use crate::config::{Config, ProcessorConfig};
use crate::dedup;
use crate::error::{json_kind, Result};
use crate::normalize::{normalize_value, normalize_with};
use crate::raw::{self, RawIssue};
use crate::summary::{Aggregator, Summary};
use crate::types::{Issue, Severity, WcagLevel};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, warn};

/// A processor shared between scanners that finish at different times.
/// Take the write lock for `add_*`/`merge_results`/`clear`, the read lock
/// for `get_issues`/`summary`.
pub type SharedProcessor = Arc<RwLock<Processor>>;

#[derive(Debug, Default)]
pub struct Processor {
    issues: Vec<Issue>,
    aggregator: Aggregator,
    catalog: Option<Catalog>,
    config: ProcessorConfig,
}

impl Processor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: ProcessorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Builds a processor from file configuration, loading its catalog.
    ///
    /// # Errors
    /// Returns error if a configured catalog cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut processor = Self::with_config(config.processor.clone());
        processor.catalog = config.load_catalog()?;
        Ok(processor)
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn into_shared(self) -> SharedProcessor {
        Arc::new(RwLock::new(self))
    }

    /// Incremental ingestion of one raw record. The tool is read from the
    /// record's `tool` field. Returns false if the record was skipped.
    pub fn add_issue(&mut self, raw: &Value) -> bool {
        let parsed = match RawIssue::from_value(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "skipping malformed issue");
                return false;
            }
        };
        self.add_raw(&parsed);
        true
    }

    /// Incremental ingestion of an already parsed record.
    pub fn add_raw(&mut self, raw: &RawIssue) {
        let tool = raw
            .tool
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(self.config.default_tool.as_str());
        let issue = normalize_with(raw, tool, self.catalog.as_ref());
        self.record(issue);
    }

    /// Retains and counts an issue that is already canonical.
    pub fn record(&mut self, issue: Issue) {
        self.aggregator.add(&issue);
        debug!(
            description = %truncate(&issue.description, 50),
            severity = %issue.severity,
            "added issue"
        );
        self.issues.push(issue);
    }

    /// Normalizes and deduplicates a map of `tool -> result container`
    /// without touching processor state.
    #[must_use]
    pub fn collect(&self, by_tool: &Value) -> Vec<Issue> {
        let Value::Object(map) = by_tool else {
            error!(found = json_kind(by_tool), "batch input is not a map of tool results");
            return Vec::new();
        };

        let mut all = Vec::new();
        for (tool, container) in map {
            let items = raw::container_items(container, tool);
            let before = all.len();
            for (index, item) in items.iter().enumerate() {
                match normalize_value(item, tool, self.catalog.as_ref()) {
                    Ok(issue) => all.push(issue),
                    Err(e) => warn!(tool = %tool, index, error = %e, "skipping malformed issue"),
                }
            }
            debug!(
                tool = %tool,
                accepted = all.len() - before,
                total = items.len(),
                "normalized tool results"
            );
        }

        let merged = dedup::merge(all);
        info!(count = merged.len(), "merged results from all tools");
        merged
    }

    /// Batch path: [`collect`](Self::collect), then retain and count the
    /// merged issues when `record_merged` is set.
    pub fn merge_results(&mut self, by_tool: &Value) -> Vec<Issue> {
        let merged = self.collect(by_tool);
        if self.config.record_merged {
            for issue in &merged {
                self.record(issue.clone());
            }
        }
        merged
    }

    /// Retained issues matching both filters; `None` matches everything.
    #[must_use]
    pub fn get_issues(&self, severity: Option<Severity>, level: Option<WcagLevel>) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.matches(severity, level))
            .collect()
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        self.aggregator.snapshot()
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Drops all retained issues and resets every counter.
    pub fn clear(&mut self) {
        self.issues.clear();
        self.aggregator.clear();
        info!("processor state cleared");
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
