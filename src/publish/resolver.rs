//! Remote branch resolution and scratch checkout initialisation.

use std::fmt;

use log::info;

use crate::error::Result;
use crate::git::Git;

/// Whether the target branch exists on the remote right now.
///
/// Computed fresh on every invocation; never carried across retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteBranchState {
    ExistsRemotely,
    AbsentRemotely,
}

/// How the scratch checkout gets onto the target branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStrategy {
    /// Fetch the branch and check it out, keeping its history.
    FetchAndCheckout,
    /// Start a parentless branch; its history is independent of the source.
    Orphan,
}

impl RemoteBranchState {
    pub fn strategy(self) -> CheckoutStrategy {
        match self {
            RemoteBranchState::ExistsRemotely => CheckoutStrategy::FetchAndCheckout,
            RemoteBranchState::AbsentRemotely => CheckoutStrategy::Orphan,
        }
    }
}

impl fmt::Display for RemoteBranchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteBranchState::ExistsRemotely => write!(f, "exists"),
            RemoteBranchState::AbsentRemotely => write!(f, "absent"),
        }
    }
}

/// Asks the remote whether `branch` exists.
pub fn resolve(git: &Git<'_>, branch: &str) -> Result<RemoteBranchState> {
    if git.remote_branch_exists(branch)? {
        Ok(RemoteBranchState::ExistsRemotely)
    } else {
        Ok(RemoteBranchState::AbsentRemotely)
    }
}

/// Puts the scratch checkout on `branch` using the strategy `state` selects.
pub fn prepare_checkout(git: &Git<'_>, branch: &str, state: RemoteBranchState) -> Result<()> {
    match state.strategy() {
        CheckoutStrategy::FetchAndCheckout => {
            git.fetch(branch)?;
            info!("Checking out branch {}", branch);
            git.checkout(branch)
        }
        CheckoutStrategy::Orphan => {
            info!("Creating orphan branch {}", branch);
            git.checkout_orphan(branch)
        }
    }
}
