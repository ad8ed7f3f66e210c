// src/cli/handlers.rs
use crate::catalog::Catalog;
use crate::cli::args::{IngestArgs, MergeArgs, OutputArgs};
use crate::config::Config;
use crate::processor::Processor;
use crate::report;
use crate::types::Severity;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Handles the merge command.
///
/// # Errors
/// Returns error if the input cannot be read or artifacts cannot be written.
pub fn handle_merge(args: &MergeArgs) -> Result<()> {
    let config = Config::load();
    let mut processor = build_processor(&config, &args.output)?;
    let input = read_json(&args.file)?;

    let merged = if args.no_record {
        processor.collect(&input)
    } else {
        processor.merge_results(&input)
    };

    let severity = args.severity.and_then(Severity::from_rank);
    let shown: Vec<_> = merged
        .iter()
        .filter(|i| i.matches(severity, args.level))
        .collect();
    println!("{}", report::issues_json(shown.iter().copied())?);

    let tools: BTreeSet<&str> = merged
        .iter()
        .flat_map(|i| i.tools.iter().map(String::as_str))
        .collect();
    eprintln!(
        "{} {} unique issues from {} tools ({} shown)",
        "merged:".green().bold(),
        merged.len(),
        tools.len(),
        shown.len()
    );

    save_if_requested(&config, &args.output, &processor)
}

/// Handles the ingest command.
///
/// # Errors
/// Returns error if the input is not a JSON array or artifacts cannot be
/// written.
pub fn handle_ingest(args: &IngestArgs) -> Result<()> {
    let config = Config::load();
    let mut processor = build_processor(&config, &args.output)?;
    let input = read_json(&args.file)?;
    let Value::Array(items) = input else {
        return Err(anyhow!("{} must contain a JSON array of issues", args.file.display()));
    };

    let accepted = items.iter().filter(|item| processor.add_issue(item)).count();
    println!("{}", report::summary_json(&processor.summary())?);

    let skipped = items.len() - accepted;
    let status = if skipped == 0 {
        format!("{accepted} issues added").green().to_string()
    } else {
        format!("{accepted} added, {} skipped", skipped.to_string().yellow())
    };
    eprintln!("{} {status}", "ingest:".bold());

    save_if_requested(&config, &args.output, &processor)
}

fn build_processor(config: &Config, output: &OutputArgs) -> Result<Processor> {
    match &output.catalog {
        Some(path) => {
            let catalog = Catalog::load(path)?;
            Ok(Processor::with_config(config.processor.clone()).with_catalog(catalog))
        }
        None => Ok(Processor::from_config(config)?),
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn save_if_requested(config: &Config, output: &OutputArgs, processor: &Processor) -> Result<()> {
    if !output.save && output.out.is_none() {
        return Ok(());
    }
    let dir = output.out.as_deref().unwrap_or(config.output.dir.as_path());
    let artifacts = report::write_artifacts(dir, processor)?;
    eprintln!(
        "{} {} and {}",
        "saved:".green().bold(),
        artifacts.issues.display(),
        artifacts.summary.display()
    );
    Ok(())
}
