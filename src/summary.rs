// src/summary.rs
//! Running statistics over canonical issues.
//!
//! Severity and tools count once per issue. Levels, principles and criteria
//! count once per WCAG reference, so `by_level` may sum to more than
//! `total_issues`.

use crate::normalize::now_rfc3339;
use crate::types::{Issue, Severity, WcagLevel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reference count and distinct criteria for one WCAG principle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipleStats {
    pub count: usize,
    pub criteria: BTreeSet<String>,
}

/// Point-in-time copy of the aggregate state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_issues: usize,
    pub by_level: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<u8, usize>,
    pub by_tool: BTreeMap<String, usize>,
    pub by_principle: BTreeMap<String, PrincipleStats>,
    #[serde(default)]
    pub by_criterion: BTreeMap<String, usize>,
    pub total_criteria_covered: usize,
    pub covered_criteria: Vec<String>,
    pub timestamp: String,
}

impl Summary {
    #[must_use]
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity.rank()).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn level_count(&self, level: WcagLevel) -> usize {
        self.by_level.get(level.name()).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn tool_count(&self, tool: &str) -> usize {
        self.by_tool.get(tool).copied().unwrap_or(0)
    }
}

/// Mutable counters behind a [`Summary`]. `add` is the only way in.
#[derive(Debug, Clone)]
pub struct Aggregator {
    total_issues: usize,
    by_level: BTreeMap<String, usize>,
    by_severity: BTreeMap<u8, usize>,
    by_tool: BTreeMap<String, usize>,
    by_principle: BTreeMap<String, PrincipleStats>,
    by_criterion: BTreeMap<String, usize>,
    covered: BTreeSet<String>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            total_issues: 0,
            by_level: WcagLevel::ALL
                .iter()
                .map(|l| (l.name().to_string(), 0))
                .collect(),
            by_severity: Severity::ALL.iter().map(|s| (s.rank(), 0)).collect(),
            by_tool: BTreeMap::new(),
            by_principle: BTreeMap::new(),
            by_criterion: BTreeMap::new(),
            covered: BTreeSet::new(),
        }
    }
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one issue.
    pub fn add(&mut self, issue: &Issue) {
        self.total_issues += 1;

        for reference in &issue.wcag_refs {
            let id = &reference.criterion_id;
            *self.by_level.entry(reference.level.name().to_string()).or_insert(0) += 1;
            *self.by_criterion.entry(id.clone()).or_insert(0) += 1;
            self.covered.insert(id.clone());

            if let Some(principle) = reference.principle() {
                let stats = self.by_principle.entry(principle.to_string()).or_default();
                stats.count += 1;
                stats.criteria.insert(id.clone());
            }
        }

        *self.by_severity.entry(issue.severity.rank()).or_insert(0) += 1;

        for tool in &issue.tools {
            *self.by_tool.entry(tool.clone()).or_insert(0) += 1;
        }
    }

    #[must_use]
    pub fn total_issues(&self) -> usize {
        self.total_issues
    }

    #[must_use]
    pub fn criteria_covered(&self) -> usize {
        self.covered.len()
    }

    #[must_use]
    pub fn snapshot(&self) -> Summary {
        Summary {
            total_issues: self.total_issues,
            by_level: self.by_level.clone(),
            by_severity: self.by_severity.clone(),
            by_tool: self.by_tool.clone(),
            by_principle: self.by_principle.clone(),
            by_criterion: self.by_criterion.clone(),
            total_criteria_covered: self.covered.len(),
            covered_criteria: self.covered.iter().cloned().collect(),
            timestamp: now_rfc3339(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WcagReference;

    fn issue(severity: Severity, refs: Vec<WcagReference>, tools: &[&str]) -> Issue {
        Issue {
            description: "d".into(),
            kind: "error".into(),
            severity,
            wcag_refs: refs,
            tools: tools.iter().map(|t| (*t).to_string()).collect(),
            context: None,
            selector: None,
            code: None,
            remediation_steps: Vec::new(),
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_empty_snapshot_has_all_buckets() {
        let summary = Aggregator::new().snapshot();
        assert_eq!(summary.total_issues, 0);
        assert_eq!(summary.by_level.len(), 3);
        assert_eq!(summary.by_severity.len(), 4);
        assert!(summary.covered_criteria.is_empty());
    }

    #[test]
    fn test_levels_count_per_reference() {
        let mut agg = Aggregator::new();
        agg.add(&issue(
            Severity::Serious,
            vec![
                WcagReference::with_level("1.1.1", WcagLevel::A),
                WcagReference::with_level("1.4.3", WcagLevel::AA),
            ],
            &["axe"],
        ));
        let summary = agg.snapshot();
        assert_eq!(summary.total_issues, 1);
        assert_eq!(summary.level_count(WcagLevel::A), 1);
        assert_eq!(summary.level_count(WcagLevel::AA), 1);
        assert_eq!(summary.severity_count(Severity::Serious), 1);
        assert_eq!(summary.by_principle["1"].count, 2);
        assert_eq!(summary.by_principle["1"].criteria.len(), 2);
    }

    #[test]
    fn test_severity_sum_matches_total() {
        let mut agg = Aggregator::new();
        for severity in [Severity::Critical, Severity::Minor, Severity::Minor] {
            agg.add(&issue(severity, vec![WcagReference::new("2.4.4")], &["pa11y"]));
        }
        let summary = agg.snapshot();
        assert_eq!(summary.by_severity.values().sum::<usize>(), summary.total_issues);
        assert_eq!(summary.total_criteria_covered, 1);
        assert_eq!(summary.by_criterion["2.4.4"], 3);
        assert_eq!(summary.tool_count("pa11y"), 3);
    }

    #[test]
    fn test_tools_counted_per_tool() {
        let mut agg = Aggregator::new();
        agg.add(&issue(Severity::Minor, Vec::new(), &["axe", "pa11y"]));
        let summary = agg.snapshot();
        assert_eq!(summary.tool_count("axe"), 1);
        assert_eq!(summary.tool_count("pa11y"), 1);
        assert_eq!(summary.total_issues, 1);
    }

    #[test]
    fn test_covered_criteria_sorted_and_cleared() {
        let mut agg = Aggregator::new();
        agg.add(&issue(
            Severity::Minor,
            vec![WcagReference::new("4.1.2"), WcagReference::new("1.3.1")],
            &["axe"],
        ));
        assert_eq!(agg.snapshot().covered_criteria, vec!["1.3.1", "4.1.2"]);
        agg.clear();
        let summary = agg.snapshot();
        assert_eq!(summary.total_criteria_covered, 0);
        assert_eq!(summary.total_issues, 0);
        assert_eq!(summary.level_count(WcagLevel::A), 0);
    }
}
