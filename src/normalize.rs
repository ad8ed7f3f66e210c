// src/normalize.rs
//! Turns one tool-specific record into one canonical [`Issue`].
//!
//! All defaulting of missing fields lives here. Parsing a raw JSON item can
//! fail (see [`normalize_value`]); normalizing an already parsed
//! [`RawIssue`] cannot.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::raw::{RawIssue, StructuredRef, WcagEntry};
use crate::severity;
use crate::types::{Issue, WcagLevel, WcagReference};
use crate::wcag;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::BTreeSet;

pub const UNKNOWN_TYPE: &str = "unknown";

/// Normalizes a parsed record without catalog enrichment.
#[must_use]
pub fn normalize_issue(raw: &RawIssue, tool: &str) -> Issue {
    normalize_with(raw, tool, None)
}

/// Parses and normalizes one raw JSON item.
///
/// # Errors
/// Returns error if the item is not an object or a primary field has the
/// wrong type. Callers log and skip.
pub fn normalize_value(value: &Value, tool: &str, catalog: Option<&Catalog>) -> Result<Issue> {
    let raw = RawIssue::from_value(value)?;
    Ok(normalize_with(&raw, tool, catalog))
}

/// Normalizes a parsed record, enriching references from `catalog`.
#[must_use]
pub fn normalize_with(raw: &RawIssue, tool: &str, catalog: Option<&Catalog>) -> Issue {
    let mut extraction = wcag::extract_with_hint(raw);
    if let Some(catalog) = catalog {
        add_catalog_code(raw, catalog, &mut extraction.ids);
    }

    let wcag_refs = extraction
        .ids
        .iter()
        .enumerate()
        .map(|(index, id)| {
            build_reference(id, structured_for(raw, id), catalog, extraction.hint_for(index))
        })
        .collect();

    Issue {
        description: raw.text().to_string(),
        kind: raw
            .kind
            .clone()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        severity: severity::normalize(&raw.severity_source()),
        wcag_refs,
        tools: BTreeSet::from([tool.to_string()]),
        context: raw.context.clone().or_else(|| raw.html.clone()),
        selector: raw.selector.clone(),
        code: raw
            .code
            .clone()
            .or_else(|| raw.rule.clone())
            .or_else(|| raw.id.clone()),
        remediation_steps: raw.remediation_steps.clone().unwrap_or_default(),
        timestamp: now_rfc3339(),
    }
}

/// Current UTC time in RFC 3339.
#[must_use]
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn add_catalog_code(raw: &RawIssue, catalog: &Catalog, ids: &mut Vec<String>) {
    let codes = [raw.code.as_deref(), raw.rule.as_deref()];
    for code in codes.into_iter().flatten() {
        if let Some(entry) = catalog.find_by_code(code) {
            if !ids.contains(&entry.id) {
                ids.push(entry.id.clone());
            }
        }
    }
}

fn structured_for<'a>(raw: &'a RawIssue, id: &str) -> Option<&'a StructuredRef> {
    let wanted = wcag::Token::Criterion(id.to_string());
    raw.wcag.iter().find_map(|entry| match entry {
        WcagEntry::Structured(s) if wcag::classify(&s.id) == wanted => Some(s),
        _ => None,
    })
}

// Precedence: structured raw ref > catalog > axe level tag from the same
// `wcag` list > A.
fn build_reference(
    id: &str,
    structured: Option<&StructuredRef>,
    catalog: Option<&Catalog>,
    level_hint: Option<WcagLevel>,
) -> WcagReference {
    let mut reference = catalog
        .and_then(|c| c.reference(id))
        .unwrap_or_else(|| WcagReference::with_level(id, level_hint.unwrap_or(WcagLevel::A)));

    let Some(s) = structured else {
        return reference;
    };
    if let Some(level) = s.level.as_deref().and_then(WcagLevel::parse) {
        reference.level = level;
    }
    if let Some(description) = s.description.as_ref().filter(|d| !d.is_empty()) {
        reference.description = description.clone();
    }
    if s.url.is_some() {
        reference.url = s.url.clone();
    }
    if !s.techniques.is_empty() {
        reference.techniques = s.techniques.clone();
    }
    if !s.failures.is_empty() {
        reference.failures = s.failures.clone();
    }
    reference
}
