pub mod catalog;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod processor;
pub mod raw;
pub mod report;
pub mod severity;
pub mod summary;
pub mod types;
pub mod wcag;

pub use processor::{Processor, SharedProcessor};
pub use summary::Summary;
pub use types::{Issue, Severity, WcagLevel, WcagReference};
