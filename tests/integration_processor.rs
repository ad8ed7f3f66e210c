// tests/integration_processor.rs
//! End-to-end tests for the processor facade: batch merge, incremental
//! ingestion and the aggregate invariants that must hold across both.

use a11ymerge_core::config::ProcessorConfig;
use a11ymerge_core::processor::Processor;
use a11ymerge_core::types::{Severity, WcagLevel};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::thread;

// --- Helpers ---

fn alt_text_batch() -> Value {
    json!({
        "axe": {
            "status": "success",
            "tool": "axe",
            "results": [{
                "message": "Missing alt text",
                "selector": "img#logo",
                "type": "error",
                "tool": "axe",
                "wcag": ["1.1.1"],
                "severity": "critical"
            }]
        },
        "pa11y": {
            "status": "success",
            "tool": "pa11y",
            "results": [{
                "message": "Missing alt text",
                "selector": "img#logo",
                "type": "error",
                "tool": "pa11y",
                "wcag": ["WCAG 1.1.1"]
            }]
        }
    })
}

fn severity_sum(p: &Processor) -> usize {
    p.summary().by_severity.values().sum()
}

// --- Batch merge ---

#[test]
fn test_dedup_union_across_tools() {
    let mut p = Processor::new();
    let merged = p.merge_results(&alt_text_batch());

    assert_eq!(merged.len(), 1);
    let issue = &merged[0];
    let expected: BTreeSet<String> = ["axe", "pa11y"].iter().map(|s| (*s).to_string()).collect();
    assert_eq!(issue.tools, expected);
    assert_eq!(issue.wcag_refs.len(), 1);
    assert_eq!(issue.wcag_refs[0].criterion_id, "1.1.1");
    assert_eq!(issue.severity, Severity::Critical);
}

#[test]
fn test_merge_keeps_first_occurrence_severity() {
    let p = Processor::new();
    let batch = json!({
        "axe": [
            {"message": "Missing alt", "selector": "img", "type": "error", "severity": "minor"}
        ],
        "pa11y": [
            {"message": "Missing alt", "selector": "img", "type": "error", "severity": "critical"}
        ]
    });
    let merged = p.collect(&batch);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].severity, Severity::Minor);
    assert!(merged[0].reported_by("pa11y"));
}

#[test]
fn test_axe_tag_noise_not_counted_as_coverage() {
    let mut p = Processor::new();
    p.add_issue(&json!({
        "message": "Images must have alternate text",
        "wcag": [
            "cat.text-alternatives", "wcag2a", "wcag111", "section508", "EN-301-549", "ACT"
        ]
    }));
    let summary = p.summary();
    assert_eq!(summary.covered_criteria, vec!["1.1.1"]);
    assert_eq!(summary.total_criteria_covered, 1);
    let principles: Vec<&str> = summary.by_principle.keys().map(String::as_str).collect();
    assert_eq!(principles, vec!["1"]);
}

#[test]
fn test_partial_failure_tolerance() {
    let mut p = Processor::new();
    let batch = json!({
        "axe": {"status": "success", "results": [
            {"message": "Form field has no label", "type": "error"},
            "garbage"
        ]}
    });
    let merged = p.merge_results(&batch);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].description, "Form field has no label");
}

#[test]
fn test_one_bad_tool_does_not_block_others() {
    let mut p = Processor::new();
    let batch = json!({
        "lighthouse": "not a container",
        "pa11y": {"results": {"issues": [{"message": 17}]}},
        "html_structure": {"issues": [
            {"message": "Missing lang attribute", "severity": "error", "wcag": ["3.1.1"]}
        ]}
    });
    let merged = p.merge_results(&batch);
    assert_eq!(merged.len(), 1);
    assert!(merged[0].reported_by("html_structure"));
    assert_eq!(p.summary().total_issues, 1);
}

#[test]
fn test_malformed_batch_container_yields_empty() {
    let mut p = Processor::new();
    for bad in [json!([1, 2, 3]), json!("axe"), json!(null), json!(42)] {
        assert!(p.merge_results(&bad).is_empty());
    }
    assert_eq!(p.summary().total_issues, 0);
    assert!(p.issues().is_empty());
}

#[test]
fn test_sort_determinism() {
    let mut p = Processor::new();
    let batch = json!({
        "axe": {"results": [
            {"message": "third", "severity": 3},
            {"message": "first", "severity": 1},
            {"message": "second", "severity": 2}
        ]}
    });
    let merged = p.merge_results(&batch);
    let ranks: Vec<u8> = merged.iter().map(|i| i.severity.rank()).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn test_lighthouse_scores_map_to_severity() {
    let p = Processor::new();
    let batch = json!({
        "lighthouse": {"status": "success", "results": [
            {"id": "color-contrast", "message": "Low contrast", "type": "error", "score": 0},
            {"id": "link-name", "message": "Links need names", "type": "warning", "score": 0.3},
            {"id": "tabindex", "message": "Tabindex > 0", "type": "warning", "score": 0.95}
        ]}
    });
    let merged = p.collect(&batch);
    let found: Vec<(&str, Severity)> = merged
        .iter()
        .map(|i| (i.code.as_deref().unwrap_or(""), i.severity))
        .collect();
    assert_eq!(
        found,
        vec![
            ("color-contrast", Severity::Critical),
            ("link-name", Severity::Serious),
            ("tabindex", Severity::Minor),
        ]
    );
}

#[test]
fn test_collect_leaves_state_untouched() {
    let p = Processor::new();
    assert_eq!(p.collect(&alt_text_batch()).len(), 1);
    assert_eq!(p.summary().total_issues, 0);
}

#[test]
fn test_record_merged_disabled() {
    let config = ProcessorConfig {
        record_merged: false,
        ..ProcessorConfig::default()
    };
    let mut p = Processor::with_config(config);
    assert_eq!(p.merge_results(&alt_text_batch()).len(), 1);
    assert_eq!(p.summary().total_issues, 0);
    assert!(p.issues().is_empty());
}

#[test]
fn test_merged_issue_counts_every_tool() {
    let mut p = Processor::new();
    p.merge_results(&alt_text_batch());
    let summary = p.summary();
    assert_eq!(summary.total_issues, 1);
    assert_eq!(summary.tool_count("axe"), 1);
    assert_eq!(summary.tool_count("pa11y"), 1);
    assert_eq!(summary.level_count(WcagLevel::A), 1);
    assert_eq!(summary.covered_criteria, vec!["1.1.1"]);
}

// --- Incremental ingestion ---

#[test]
fn test_add_issue_uses_record_tool() {
    let mut p = Processor::new();
    assert!(p.add_issue(&json!({"message": "No skip link", "tool": "axe", "wcag": ["2.4.1"]})));
    assert!(p.add_issue(&json!({"message": "No skip link"})));
    let summary = p.summary();
    assert_eq!(summary.tool_count("axe"), 1);
    assert_eq!(summary.tool_count("unknown"), 1);
    // no dedup across incremental calls
    assert_eq!(summary.total_issues, 2);
}

#[test]
fn test_add_issue_skips_garbage() {
    let mut p = Processor::new();
    assert!(!p.add_issue(&json!("garbage")));
    assert!(!p.add_issue(&json!({"type": ["not", "a", "string"]})));
    assert_eq!(p.summary().total_issues, 0);
}

#[test]
fn test_incremental_and_batch_agree() {
    let raw = json!({
        "message": "Empty button",
        "type": "error",
        "severity": "serious",
        "wcag": ["4.1.2"]
    });

    let mut incremental = Processor::new();
    let mut with_tool = raw.clone();
    with_tool["tool"] = json!("axe");
    incremental.add_issue(&with_tool);

    let mut batch = Processor::new();
    batch.merge_results(&json!({"axe": {"results": [raw]}}));

    let (a, b) = (incremental.summary(), batch.summary());
    assert_eq!(a.total_issues, b.total_issues);
    assert_eq!(a.by_severity, b.by_severity);
    assert_eq!(a.by_level, b.by_level);
    assert_eq!(a.by_tool, b.by_tool);
    assert_eq!(a.covered_criteria, b.covered_criteria);
    assert_eq!(incremental.issues()[0].key(), batch.issues()[0].key());
}

// --- Aggregate invariants ---

#[test]
fn test_severity_sum_equals_total_after_any_sequence() {
    let mut p = Processor::new();
    let inputs = [
        json!({"message": "a", "severity": "critical"}),
        json!({"message": "b", "impact": "minor", "wcag": ["1.1.1", "1.4.3"]}),
        json!({"message": "c", "severity": 99}),
        json!({"message": "d"}),
    ];
    for input in &inputs {
        p.add_issue(input);
        assert_eq!(severity_sum(&p), p.summary().total_issues);
    }
    p.merge_results(&alt_text_batch());
    assert_eq!(severity_sum(&p), p.summary().total_issues);
}

#[test]
fn test_level_counting_is_per_reference() {
    let mut p = Processor::new();
    p.add_issue(&json!({
        "message": "Low contrast image of text",
        "wcag": [{"id": "1.1.1", "level": "A"}, {"id": "1.4.3", "level": "AA"}]
    }));
    let summary = p.summary();
    assert_eq!(summary.total_issues, 1);
    assert_eq!(summary.level_count(WcagLevel::A), 1);
    assert_eq!(summary.level_count(WcagLevel::AA), 1);
    assert_eq!(summary.level_count(WcagLevel::AAA), 0);
}

#[test]
fn test_coverage_is_monotonic_until_clear() {
    let mut p = Processor::new();
    let mut last = 0;
    for ids in [vec!["1.1.1"], vec!["1.1.1", "2.4.4"], vec![], vec!["4.1.2"]] {
        p.add_issue(&json!({"message": "x", "wcag": ids}));
        let summary = p.summary();
        assert!(summary.total_criteria_covered >= last);
        assert_eq!(summary.total_criteria_covered, summary.covered_criteria.len());
        last = summary.total_criteria_covered;
    }
    assert_eq!(last, 3);

    p.clear();
    let summary = p.summary();
    assert_eq!(summary.total_criteria_covered, 0);
    assert!(summary.covered_criteria.is_empty());
    assert!(p.issues().is_empty());
}

#[test]
fn test_principles_grouped_by_leading_digit() {
    let mut p = Processor::new();
    p.add_issue(&json!({"message": "x", "wcag": ["1.1.1", "1.3.1", "4.1.2"]}));
    let summary = p.summary();
    assert_eq!(summary.by_principle["1"].count, 2);
    assert_eq!(summary.by_principle["4"].count, 1);
    assert!(!summary.by_principle.contains_key("2"));
}

// --- Filtering ---

#[test]
fn test_get_issues_filters_combine() {
    let mut p = Processor::new();
    p.add_issue(&json!({"message": "a", "severity": 1, "wcag": [{"id": "1.4.3", "level": "AA"}]}));
    p.add_issue(&json!({"message": "b", "severity": 1, "wcag": ["1.1.1"]}));
    p.add_issue(&json!({"message": "c", "severity": 4, "wcag": [{"id": "2.4.7", "level": "AA"}]}));

    assert_eq!(p.get_issues(None, None).len(), 3);
    assert_eq!(p.get_issues(Some(Severity::Critical), None).len(), 2);
    assert_eq!(p.get_issues(None, Some(WcagLevel::AA)).len(), 2);

    let both = p.get_issues(Some(Severity::Critical), Some(WcagLevel::AA));
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].description, "a");
    assert!(p.get_issues(Some(Severity::Serious), None).is_empty());
}

// --- Shared use ---

#[test]
fn test_shared_processor_serializes_writers() {
    let shared = Processor::new().into_shared();
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let raw = json!({
                        "message": format!("scanner {n} issue {i}"),
                        "tool": format!("scanner{n}"),
                        "wcag": ["1.1.1"]
                    });
                    shared.write().unwrap().add_issue(&raw);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let p = shared.read().unwrap();
    let summary = p.summary();
    assert_eq!(summary.total_issues, 100);
    assert_eq!(summary.by_tool.len(), 4);
    assert_eq!(summary.by_severity.values().sum::<usize>(), 100);
    assert_eq!(summary.total_criteria_covered, 1);
}
