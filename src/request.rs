//! Caller-supplied publish parameters.

use std::path::PathBuf;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::defaults;
use crate::git::GitIdentity;

/// Bounded, fixed-delay retry schedule for the push loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total push attempts, including the first one.
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(defaults::PUSH_ATTEMPTS, defaults::push_retry_delay())
    }
}

/// Everything the caller decides about a publish.
#[derive(Clone)]
pub struct PublishRequest {
    /// Directory holding the built artifact. Read, never modified.
    pub folder: PathBuf,
    /// Credential with write access to the remote.
    pub token: String,
    /// Branch that receives the artifact.
    pub branch: String,
    /// Prepended to the triggering tag name to form the release tag.
    pub tag_prefix: String,
    pub git_user_name: Option<String>,
    pub git_user_email: Option<String>,
    pub retry: RetryPolicy,
    /// Create an annotated release tag instead of a lightweight one.
    pub annotate_tag: bool,
}

impl PublishRequest {
    pub fn new(folder: impl Into<PathBuf>, token: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            token: token.into(),
            branch: branch.into(),
            tag_prefix: String::new(),
            git_user_name: None,
            git_user_email: None,
            retry: RetryPolicy::default(),
            annotate_tag: false,
        }
    }

    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = prefix.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Committer identity, falling back to the bot identity.
    pub fn identity(&self) -> GitIdentity {
        GitIdentity {
            name: self
                .git_user_name
                .clone()
                .unwrap_or_else(|| defaults::GIT_USER_NAME.to_string()),
            email: self
                .git_user_email
                .clone()
                .unwrap_or_else(|| defaults::GIT_USER_EMAIL.to_string()),
        }
    }

    /// `Authorization` header value for HTTP remotes.
    pub fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.identity().name, self.token);
        format!("Authorization: Basic {}", STANDARD.encode(credentials))
    }
}

impl std::fmt::Debug for PublishRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishRequest")
            .field("folder", &self.folder)
            .field("token", &"<redacted>")
            .field("branch", &self.branch)
            .field("tag_prefix", &self.tag_prefix)
            .field("git_user_name", &self.git_user_name)
            .field("git_user_email", &self.git_user_email)
            .field("retry", &self.retry)
            .field("annotate_tag", &self.annotate_tag)
            .finish()
    }
}
