// src/report.rs
//! The two JSON artifacts of a run: the issue list and the summary.

use crate::error::{EngineError, Result};
use crate::processor::Processor;
use crate::summary::Summary;
use crate::types::Issue;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ISSUES_PREFIX: &str = "accessibility_issues";
pub const SUMMARY_PREFIX: &str = "analysis_summary";

/// Paths of the artifacts written by [`write_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub issues: PathBuf,
    pub summary: PathBuf,
}

/// Renders the issue-list document.
///
/// # Errors
/// Returns error if serialization fails.
pub fn issues_json<'a, I>(issues: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Issue>,
{
    let issues: Vec<&Issue> = issues.into_iter().collect();
    Ok(serde_json::to_string_pretty(&issues)?)
}

/// Renders the summary document.
///
/// # Errors
/// Returns error if serialization fails.
pub fn summary_json(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Writes both documents into `dir` (created if needed) with a shared
/// local-time suffix, e.g. `accessibility_issues_20240131_235959.json`.
///
/// # Errors
/// Returns error if the directory or either file cannot be written.
pub fn write_artifacts(dir: &Path, processor: &Processor) -> Result<Artifacts> {
    fs::create_dir_all(dir).map_err(|e| EngineError::io(e, dir))?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let artifacts = Artifacts {
        issues: dir.join(format!("{ISSUES_PREFIX}_{stamp}.json")),
        summary: dir.join(format!("{SUMMARY_PREFIX}_{stamp}.json")),
    };

    write_file(&artifacts.issues, &issues_json(processor.issues())?)?;
    write_file(&artifacts.summary, &summary_json(&processor.summary())?)?;

    info!(dir = %dir.display(), "results saved");
    Ok(artifacts)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| EngineError::io(e, path))
}
