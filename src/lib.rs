//! # Branch Publish Library
//!
//! This library publishes a locally built artifact directory to a dedicated
//! branch of a remote git repository. It is used by the `branch-publish`
//! command-line tool but can be embedded anywhere a [`CommandRunner`] can
//! execute `git`.
//!
//! ## Quick Example
//!
//! ```no_run
//! use branch_publish::env::{Environment, InvocationContext};
//! use branch_publish::publish::Publisher;
//! use branch_publish::request::PublishRequest;
//! use branch_publish::runner::SystemRunner;
//!
//! let context = InvocationContext::from_environment(&Environment::process())?;
//! let request = PublishRequest::new("dist", "token", "build").with_tag_prefix("build-");
//!
//! let report = Publisher::new(&SystemRunner, context, request).run()?;
//! println!("published {}", report.commit);
//! # Ok::<(), branch_publish::error::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Invocation context (`env`)**: what the CI environment says about this
//!   run: triggering ref, event kind, repository, scratch location.
//! - **Command runner (`runner`, `git`)**: every side effect on a repository is
//!   a `git` command executed through a swappable runner.
//! - **Publishing (`publish`)**: preflight checks, branch resolution,
//!   snapshotting, the push-retry loop and release tagging.
//! - **Engine contract (`engine`)**: the typed boundary to the external
//!   bundler that produces the artifact.
//!
//! [`CommandRunner`]: runner::CommandRunner

pub mod defaults;
pub mod engine;
pub mod env;
pub mod error;
pub mod git;
pub mod output;
pub mod publish;
pub mod request;
pub mod runner;
