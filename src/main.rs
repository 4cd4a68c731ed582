//! # Branch Publish CLI
//!
//! This is the binary entry point for the `branch-publish` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Turning any error into a non-zero exit with a readable message.
//!
//! The publishing logic lives in the library crate; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
