use std::process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use a11ymerge_core::cli::{dispatch, Cli};
use a11ymerge_core::logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    dispatch::execute(cli.command)
}
