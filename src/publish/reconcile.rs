//! Push-retry reconciler.
//!
//! Converges the remote branch onto a fresh snapshot without holding any lock:
//! the remote's atomic ref update is the only serialization point. A rejected
//! push means another publisher advanced the branch first, so the local commit
//! is thrown away, the checkout is reset to the new remote tip and the
//! snapshot is taken again on top of it. Rejected commits are never rebased;
//! the artifact folder, not the commit object, is the source of truth.

use std::path::Path;
use std::thread;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::git::Git;
use crate::publish::snapshot::{self, SourceRevision};
use crate::request::RetryPolicy;

/// What happened to one push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Pushed,
    Rejected { reason: String },
}

/// One iteration of the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAttempt {
    /// 1-based attempt number.
    pub number: u32,
    pub source_sha: String,
    pub message: String,
    pub outcome: AttemptOutcome,
}

/// Snapshots and pushes until the remote accepts or `policy` is exhausted.
///
/// Returns every attempt made; the last one is the accepted push.
pub fn reconcile(
    git: &Git<'_>,
    branch: &str,
    artifact: &Path,
    revision: &SourceRevision,
    policy: RetryPolicy,
) -> Result<Vec<PublishAttempt>> {
    let mut attempts = Vec::new();

    for number in 1..=policy.attempts {
        snapshot::commit(git, artifact, revision)?;

        info!("Pushing changes (attempt {}/{})", number, policy.attempts);
        let outcome = match git.push_branch(branch)? {
            Ok(()) => AttemptOutcome::Pushed,
            Err(rejection) => AttemptOutcome::Rejected {
                reason: rejection.stderr,
            },
        };

        let pushed = outcome == AttemptOutcome::Pushed;
        attempts.push(PublishAttempt {
            number,
            source_sha: revision.short_sha.clone(),
            message: revision.commit_message(),
            outcome,
        });
        if pushed {
            return Ok(attempts);
        }

        warn!("Push failed. Retrying with the latest changes...");
        if number < policy.attempts {
            git.fetch(branch)?;
            git.reset_to_remote(branch)?;
            thread::sleep(policy.delay);
        }
    }

    Err(Error::PublishConvergence {
        branch: branch.to_string(),
        attempts: policy.attempts,
    })
}
