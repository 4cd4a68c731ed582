//! # Branch Publishing
//!
//! The publish synchronizer: propagates a locally built artifact directory to
//! a dedicated branch of a remote git repository and, on tag events, stamps a
//! release tag on the result.
//!
//! ## Control flow
//!
//! 1. **Preflight** ([`preflight`]): reject invocations that would publish
//!    over the source branch or re-trigger on a release tag.
//! 2. **Clone and setup**: clone the remote into a private scratch directory
//!    and configure the committer identity.
//! 3. **Resolve** ([`resolver`]): check out the target branch, or bootstrap
//!    it as an orphan on first publish.
//! 4. **Reconcile** ([`reconcile`]): snapshot the artifact ([`snapshot`]) and
//!    push, re-snapshotting on top of the remote tip whenever a concurrent
//!    publisher wins the race.
//! 5. **Tag** ([`tagger`]): on tag events, tag the pushed tip and push the tag.
//!
//! Every step runs sequentially. Concurrency safety across invocations comes
//! entirely from the remote's atomic ref updates; nothing here locks.

pub mod preflight;
pub mod reconcile;
pub mod resolver;
pub mod snapshot;
pub mod tagger;

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::info;

use crate::defaults;
use crate::env::InvocationContext;
use crate::error::{Error, Result};
use crate::git::Git;
use crate::request::PublishRequest;
use crate::runner::CommandRunner;

use self::reconcile::PublishAttempt;
use self::resolver::RemoteBranchState;
use self::snapshot::SourceRevision;

/// Summary of a completed publish.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub branch: String,
    pub remote_state: RemoteBranchState,
    pub source: SourceRevision,
    /// Every push attempt; the last one was accepted.
    pub attempts: Vec<PublishAttempt>,
    /// Id of the published commit.
    pub commit: String,
    /// Release tag pushed, if the invocation was a tag event.
    pub tag: Option<String>,
}

/// Runs one publish invocation.
pub struct Publisher<'a> {
    runner: &'a dyn CommandRunner,
    context: InvocationContext,
    request: PublishRequest,
}

impl<'a> Publisher<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        context: InvocationContext,
        request: PublishRequest,
    ) -> Self {
        Self {
            runner,
            context,
            request,
        }
    }

    pub fn run(&self) -> Result<PublishReport> {
        let branch = self.request.branch.as_str();
        let source = Git::new(self.runner, &self.context.workspace);

        let current_branch = source.current_branch()?;
        preflight::check(&self.context, &self.request, &current_branch)?;

        let artifact = self.artifact_dir()?;
        info!("Publish dir: {}", artifact.display());

        let revision = SourceRevision::read(&source)?;
        info!("Publishing {}", revision.short_sha);

        fs::create_dir_all(&self.context.scratch_root)?;
        let scratch = tempfile::Builder::new()
            .prefix(defaults::SCRATCH_PREFIX)
            .tempdir_in(&self.context.scratch_root)?;
        info!("Created scratch dir {}", scratch.path().display());

        let url = self.context.remote_url()?;
        let git = Git::new(self.runner, scratch.path())
            .with_extra_header(&url, &self.request.auth_header());

        info!("Cloning {}", url);
        git.clone_no_checkout(&url)?;

        info!("Setting up repo");
        git.set_identity(&self.request.identity())?;

        let remote_state = resolver::resolve(&git, branch)?;
        info!("Remote branch {} {}", branch, remote_state);
        resolver::prepare_checkout(&git, branch, remote_state)?;

        let attempts =
            reconcile::reconcile(&git, branch, &artifact, &revision, self.request.retry)?;
        let commit = git.rev_parse("HEAD")?;
        info!("Published {} to {}", commit, branch);

        let tag = tagger::tag_release(&git, &self.context, &self.request)?;

        Ok(PublishReport {
            branch: branch.to_string(),
            remote_state,
            source: revision,
            attempts,
            commit,
            tag,
        })
    }

    /// Canonical path of the artifact folder.
    fn artifact_dir(&self) -> Result<PathBuf> {
        let folder = &self.request.folder;
        let path = fs::canonicalize(folder).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::Configuration {
                message: format!("Artifact folder not found: {}", folder.display()),
                hint: Some("Build the artifact before publishing".to_string()),
            },
            _ => Error::Io(e),
        })?;
        if !path.is_dir() {
            return Err(Error::configuration(format!(
                "Artifact path is not a directory: {}",
                folder.display()
            )));
        }
        Ok(path)
    }
}
