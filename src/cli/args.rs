use crate::types::WcagLevel;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "a11ymerge", version, about = "Accessibility findings normalizer")]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge per-tool scanner results into one deduplicated issue list
    Merge(MergeArgs),
    /// Add raw issues one at a time and print the running summary
    Ingest(IngestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// JSON object mapping tool name to its result container
    pub file: PathBuf,
    /// Do not feed merged issues into the running totals
    #[arg(long)]
    pub no_record: bool,
    /// Only print issues of this severity (1 = critical .. 4 = minor)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub severity: Option<u8>,
    /// Only print issues with at least one reference at this level
    #[arg(long)]
    pub level: Option<WcagLevel>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    /// JSON array of raw issue records
    pub file: PathBuf,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write the issue list and summary artifacts
    #[arg(long)]
    pub save: bool,
    /// Artifact directory (implies --save)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
    /// WCAG criterion catalog (overrides a11ymerge.toml)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
}
