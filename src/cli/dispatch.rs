//! Routes parsed subcommands to their handlers.

use super::args::Commands;
use super::handlers::{handle_ingest, handle_merge};
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Merge(args) => handle_merge(&args),
        Commands::Ingest(args) => handle_ingest(&args),
    }
}
