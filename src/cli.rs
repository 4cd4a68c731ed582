//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// Branch Publish - Publish a build output folder to a git branch
#[derive(Parser, Debug)]
#[command(name = "branch-publish")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish a folder to a branch of the current GitHub repository
    Publish(commands::publish::PublishArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level);

        match self.command {
            Commands::Publish(args) => commands::publish::execute(args, &self.color),
        }
    }
}

/// Logs to stderr at `level`, unless `RUST_LOG` says otherwise.
fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    // A logger may already be installed when executed from tests
    let _ = builder.try_init();
}
