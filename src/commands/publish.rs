//! # Publish Command Implementation
//!
//! This module implements the `publish` subcommand, which copies a built
//! artifact folder onto a dedicated branch of the current GitHub repository.
//!
//! ## Functionality
//!
//! - **Environment**: the repository, triggering ref, event kind and scratch
//!   location are read from the GitHub Actions environment
//!   (`GITHUB_REPOSITORY`, `GITHUB_REF`, `GITHUB_EVENT_NAME`, `RUNNER_TEMP`).
//!
//! - **Publishing**: the folder is committed to `--branch` on top of its
//!   current remote tip, retrying when a concurrent publish gets there first.
//!
//! - **Tagging**: when the workflow was triggered by a tag, the published
//!   commit is tagged `<tag-prefix><tag>` and the tag is pushed.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use branch_publish::defaults;
use branch_publish::env::{Environment, InvocationContext};
use branch_publish::error::Error;
use branch_publish::output::{self, OutputConfig, Status};
use branch_publish::publish::Publisher;
use branch_publish::request::{PublishRequest, RetryPolicy};
use branch_publish::runner::SystemRunner;

/// Publish a folder to a branch
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Folder holding the built output to publish.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Branch to publish to. Must differ from the branch being built.
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: String,

    /// Token with write access to the repository.
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Prefix for the release tag created on tag events.
    #[arg(long, value_name = "PREFIX", default_value = "")]
    pub tag_prefix: String,

    /// Committer name for the publish commit.
    #[arg(long, value_name = "NAME")]
    pub git_user_name: Option<String>,

    /// Committer email for the publish commit.
    #[arg(long, value_name = "EMAIL")]
    pub git_user_email: Option<String>,

    /// Total push attempts before giving up.
    #[arg(long, value_name = "N", default_value_t = defaults::PUSH_ATTEMPTS)]
    pub retries: u32,

    /// Delay between push attempts, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = defaults::PUSH_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// Create an annotated release tag instead of a lightweight one.
    #[arg(long)]
    pub annotate_tag: bool,

    /// Suppress the summary; errors are still reported.
    #[arg(short, long)]
    pub quiet: bool,
}

impl PublishArgs {
    fn into_request(self) -> PublishRequest {
        PublishRequest {
            folder: self.folder,
            token: self.token,
            branch: self.branch,
            tag_prefix: self.tag_prefix,
            git_user_name: self.git_user_name,
            git_user_email: self.git_user_email,
            retry: RetryPolicy::new(self.retries, Duration::from_millis(self.retry_delay_ms)),
            annotate_tag: self.annotate_tag,
        }
    }
}

/// Execute the `publish` command.
pub fn execute(args: PublishArgs, color: &str) -> Result<()> {
    let config = OutputConfig::from_env_and_flag(color);
    let quiet = args.quiet;

    let context = InvocationContext::from_environment(&Environment::process())?;
    let request = args.into_request();

    match Publisher::new(&SystemRunner, context, request).run() {
        Ok(report) => {
            if !quiet {
                for line in output::summary(&config, &report) {
                    println!("{}", line);
                }
            }
            Ok(())
        }
        Err(e) => {
            if !quiet {
                println!("{}", failure_line(&config, &e));
            }
            Err(e.into())
        }
    }
}

/// Status line for a failed publish.
fn failure_line(config: &OutputConfig, error: &Error) -> String {
    let marker = config.marker(Status::Failure);
    if error.is_configuration() {
        format!("{} Nothing was published: the invocation is misconfigured", marker)
    } else {
        format!("{} Publish failed", marker)
    }
}
