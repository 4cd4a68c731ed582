//! Typed git operations over a [`CommandRunner`].
//!
//! Each method maps to exactly one `git` invocation inside a fixed working
//! directory. Failures become [`Error::Subprocess`] except where the caller
//! needs the raw outcome (remote branch lookup, push).

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::runner::{CommandOutput, CommandRunner, Invocation};

/// Name of the remote created by `git clone`.
pub const REMOTE: &str = "origin";

/// Exit code of `git ls-remote --exit-code` when no ref matched.
const LS_REMOTE_NO_MATCH: i32 = 2;

/// Committer identity written to the scratch checkout's config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

/// Result of a push that git refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRejection {
    pub stderr: String,
}

/// A git working directory plus the environment every call carries.
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    dir: PathBuf,
    envs: Vec<(String, String)>,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn CommandRunner, dir: &Path) -> Self {
        Self {
            runner,
            dir: dir.to_path_buf(),
            envs: Vec::new(),
        }
    }

    /// Sends `header` with every HTTP request to `url`.
    ///
    /// The header travels through `GIT_CONFIG_*` environment entries so it
    /// is neither written to disk nor visible in the process arguments.
    pub fn with_extra_header(mut self, url: &str, header: &str) -> Self {
        self.envs = vec![
            ("GIT_CONFIG_COUNT".to_string(), "1".to_string()),
            (
                "GIT_CONFIG_KEY_0".to_string(),
                format!("http.{}.extraheader", url),
            ),
            ("GIT_CONFIG_VALUE_0".to_string(), header.to_string()),
        ];
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn invocation(&self, args: &[&str]) -> Invocation {
        Invocation::git(&self.dir, args.iter().copied()).with_envs(&self.envs)
    }

    /// Runs without interpreting the exit status.
    fn try_run(&self, args: &[&str]) -> Result<(Invocation, CommandOutput)> {
        let invocation = self.invocation(args);
        let output = self.runner.run(&invocation)?;
        Ok((invocation, output))
    }

    /// Runs and fails on a non-zero exit status.
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let (invocation, output) = self.try_run(args)?;
        output.check(&invocation)
    }

    fn run_text(&self, args: &[&str]) -> Result<String> {
        Ok(self.run(args)?.stdout.trim().to_string())
    }

    /// Name of the checked-out branch (`HEAD` when detached).
    pub fn current_branch(&self) -> Result<String> {
        self.run_text(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Abbreviated id of `HEAD`.
    pub fn head_short_sha(&self) -> Result<String> {
        self.run_text(&["rev-parse", "--short", "HEAD"])
    }

    /// Full commit message of `HEAD`.
    pub fn head_message(&self) -> Result<String> {
        self.run_text(&["log", "-1", "--format=%B"])
    }

    /// Full id of `rev`.
    pub fn rev_parse(&self, rev: &str) -> Result<String> {
        self.run_text(&["rev-parse", rev])
    }

    /// Clones `url` into this (empty) directory without populating the
    /// working tree.
    pub fn clone_no_checkout(&self, url: &str) -> Result<()> {
        let (invocation, output) = self.try_run(&["clone", "--no-checkout", url, "."])?;
        if output.success() {
            return Ok(());
        }

        // Provide helpful error message for common auth failures
        let stderr = output.stderr.trim();
        let stderr = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
            || stderr.contains("could not read Username")
        {
            format!(
                "{}\nThe token needs write access to the repository contents.",
                stderr
            )
        } else {
            stderr.to_string()
        };

        Err(Error::Subprocess {
            command: invocation.to_string(),
            code: output.code,
            stderr,
        })
    }

    pub fn set_identity(&self, identity: &GitIdentity) -> Result<()> {
        self.run(&["config", "user.name", &identity.name])?;
        self.run(&["config", "user.email", &identity.email])?;
        Ok(())
    }

    /// Whether `branch` exists on the remote.
    ///
    /// "No such ref" is an answer, not a failure; anything else that makes
    /// `ls-remote` exit non-zero is reported as [`Error::RemoteQuery`].
    pub fn remote_branch_exists(&self, branch: &str) -> Result<bool> {
        let head = format!("refs/heads/{}", branch);
        let (_, output) = self.try_run(&["ls-remote", "--exit-code", REMOTE, &head])?;
        match output.code {
            Some(0) => Ok(true),
            Some(LS_REMOTE_NO_MATCH) => Ok(false),
            _ => Err(Error::RemoteQuery {
                url: REMOTE.to_string(),
                stderr: output.stderr.trim().to_string(),
            }),
        }
    }

    pub fn fetch(&self, branch: &str) -> Result<()> {
        self.run(&["fetch", REMOTE, branch])?;
        Ok(())
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch])?;
        Ok(())
    }

    /// Starts `branch` with no parent commit.
    pub fn checkout_orphan(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "--orphan", branch])?;
        Ok(())
    }

    /// Removes every tracked file from the index and working tree.
    pub fn remove_all(&self) -> Result<()> {
        self.run(&["rm", "-r", "-f", "-q", "--ignore-unmatch", "."])?;
        Ok(())
    }

    /// Stages everything in the checkout, including paths matched by an
    /// ignore file shipped with the artifact.
    pub fn add_all(&self) -> Result<()> {
        self.run(&["add", "--all", "--force", "."])?;
        Ok(())
    }

    /// Commits the index, even when nothing changed.
    pub fn commit_allow_empty(&self, message: &str) -> Result<()> {
        self.run(&["commit", "--allow-empty", "-q", "-m", message])?;
        Ok(())
    }

    /// Pushes `branch`, returning the rejection instead of failing.
    pub fn push_branch(&self, branch: &str) -> Result<std::result::Result<(), PushRejection>> {
        let (_, output) = self.try_run(&["push", "--set-upstream", REMOTE, branch])?;
        if output.success() {
            Ok(Ok(()))
        } else {
            Ok(Err(PushRejection {
                stderr: output.stderr.trim().to_string(),
            }))
        }
    }

    /// Moves the checked-out branch to the remote tip, discarding local
    /// commits and changes.
    pub fn reset_to_remote(&self, branch: &str) -> Result<()> {
        let tip = format!("{}/{}", REMOTE, branch);
        self.run(&["reset", "--hard", &tip])?;
        Ok(())
    }

    /// Creates `tag` at `target`; annotated when `message` is given.
    pub fn tag(&self, tag: &str, target: &str, message: Option<&str>) -> Result<()> {
        match message {
            Some(message) => self.run(&["tag", "-a", tag, "-m", message, target])?,
            None => self.run(&["tag", tag, target])?,
        };
        Ok(())
    }

    pub fn push_tag(&self, tag: &str) -> Result<()> {
        let refspec = format!("refs/tags/{}", tag);
        self.run(&["push", REMOTE, &refspec])?;
        Ok(())
    }
}
