// src/dedup.rs
//! Cross-tool deduplication.
//!
//! Issues are grouped by [`IssueKey`] (exact string equality). The first
//! occurrence of a key is kept and later ones are folded into it. Output is
//! stably sorted by severity, type, then description.

use crate::types::{Issue, IssueKey, WcagReference};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Merges issues that share an identity key.
#[must_use]
pub fn merge(issues: Vec<Issue>) -> Vec<Issue> {
    let input_len = issues.len();
    let mut index: HashMap<IssueKey, usize> = HashMap::new();
    let mut merged: Vec<Issue> = Vec::with_capacity(input_len);

    for mut issue in issues {
        let key = issue.key();
        if let Some(&slot) = index.get(&key) {
            if let Some(kept) = merged.get_mut(slot) {
                absorb(kept, issue);
            }
            continue;
        }
        dedup_refs(&mut issue.wcag_refs);
        index.insert(key, merged.len());
        merged.push(issue);
    }

    sort_issues(&mut merged);
    debug!(input = input_len, output = merged.len(), "deduplicated issues");
    merged
}

/// Folds `dup` into `kept`.
///
/// Only tools and references are unioned (the first reference for a
/// criterion wins). Every other field of `kept` stays as first reported.
pub fn absorb(kept: &mut Issue, dup: Issue) {
    kept.tools.extend(dup.tools);

    kept.wcag_refs.extend(dup.wcag_refs);
    dedup_refs(&mut kept.wcag_refs);
}

/// Drops later references to an already seen criterion, keeping order.
pub fn dedup_refs(refs: &mut Vec<WcagReference>) {
    let mut seen = HashSet::new();
    refs.retain(|r| seen.insert(r.criterion_id.clone()));
}

/// Stable sort: severity ascending, then type, then description.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(compare);
}

fn compare(a: &Issue, b: &Issue) -> Ordering {
    a.severity
        .cmp(&b.severity)
        .then_with(|| a.kind.cmp(&b.kind))
        .then_with(|| a.description.cmp(&b.description))
}
