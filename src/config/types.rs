use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub processor: ProcessorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Batch merges feed the aggregator and the retained issue list.
    #[serde(default = "default_true")]
    pub record_merged: bool,
    /// Tool name for incremental records that carry none.
    #[serde(default = "default_tool")]
    pub default_tool: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            record_merged: default_true(),
            default_tool: default_tool(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_output_dir() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

const fn default_true() -> bool { true }
fn default_tool() -> String { "unknown".to_string() }
fn default_output_dir() -> PathBuf { PathBuf::from("output/results") }
