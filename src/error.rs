//! # Error Handling
//!
//! This module defines the centralized error type for `branch-publish`. It uses
//! `thiserror` to describe every failure the publish workflow can surface to
//! its caller, each variant carrying enough context to act on the message.
//!
//! ## Taxonomy
//!
//! - **`Configuration`**: the invocation itself is wrong (publishing over the
//!   source branch, a release tag re-entering the pipeline, a missing artifact
//!   folder). Raised before any remote mutation and never retried.
//! - **`RemoteQuery`**: the remote could not be asked whether the target branch
//!   exists. A plain "branch not found" answer is *not* an error.
//! - **`PublishConvergence`**: every push attempt was rejected because other
//!   publishers kept winning the race. The artifact must be treated as
//!   unpublished.
//! - **`Subprocess`** / **`Spawn`**: an underlying command failed outside the
//!   push step, or could not be started at all.
//! - **`Tag`**: the release tag could not be created or pushed. The branch
//!   publish that preceded it stays in place.
//!
//! A rejected push is deliberately absent from this list: it is an expected
//! outcome consumed by the retry loop, modelled as
//! [`AttemptOutcome::Rejected`](crate::publish::reconcile::AttemptOutcome).

use thiserror::Error;

/// Main error type for branch-publish operations
#[derive(Error, Debug)]
pub enum Error {
    /// The invocation is misconfigured and must be fixed by the caller.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Configuration {
        message: String,
        /// Optional hint for how to fix the configuration
        hint: Option<String>,
    },

    /// A required environment variable is not set.
    #[error("Missing required environment variable: {name}")]
    MissingEnv { name: String },

    /// The remote could not be queried for the target branch.
    #[error("Failed to query remote {url}: {stderr}")]
    RemoteQuery { url: String, stderr: String },

    /// Every push attempt was rejected by the remote.
    #[error("Failed to publish to branch '{branch}' after {attempts} attempts: the remote kept diverging")]
    PublishConvergence { branch: String, attempts: u32 },

    /// A command exited with a non-zero status.
    #[error("Command failed ({}): {command}{}", code.map(|c| format!("exit code {}", c)).unwrap_or_else(|| "terminated by signal".to_string()), if stderr.is_empty() { String::new() } else { format!(" - {}", stderr) })]
    Subprocess {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A command could not be started.
    #[error("Failed to run {program}: {message}")]
    Spawn { program: String, message: String },

    /// The release tag could not be created or pushed.
    #[error("Failed to publish tag '{tag}': {message}")]
    Tag { tag: String, message: String },

    /// The bundling engine reported diagnostics.
    #[error("Bundling failed with {count} diagnostic(s):\n{details}")]
    Diagnostics { count: usize, details: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::Configuration`] without a hint.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            hint: None,
        }
    }

    /// Whether this error was raised before anything was mutated, i.e. the
    /// remote is untouched.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. } | Error::MissingEnv { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
