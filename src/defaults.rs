//! Default values for branch-publish.
//!
//! This module provides centralized default values used by the library and
//! the CLI, ensuring both agree on what an unconfigured invocation does.

use std::time::Duration;

/// Committer name used when no identity override is supplied.
pub const GIT_USER_NAME: &str = "github-actions";

/// Committer email used when no identity override is supplied.
pub const GIT_USER_EMAIL: &str = "github-actions@github.com";

/// Number of push attempts before giving up.
pub const PUSH_ATTEMPTS: u32 = 5;

/// Delay between push attempts, in milliseconds.
pub const PUSH_RETRY_DELAY_MS: u64 = 2000;

/// Prefix of the private scratch directory created under `RUNNER_TEMP`.
pub const SCRATCH_PREFIX: &str = "branch-publish-";

/// Server used to build the remote URL when `GITHUB_SERVER_URL` is unset.
pub const SERVER_URL: &str = "https://github.com";

/// Returns the default delay between push attempts.
pub fn push_retry_delay() -> Duration {
    Duration::from_millis(PUSH_RETRY_DELAY_MS)
}
