//! Snapshot committer: turns the scratch checkout into an exact mirror of the
//! artifact folder and records it as one commit.

use std::fs;
use std::path::Path;

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::git::Git;

/// Directory name skipped when mirroring the artifact.
const GIT_DIR: &str = ".git";

/// The source commit a publish is produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRevision {
    pub short_sha: String,
    pub message: String,
}

impl SourceRevision {
    /// Reads `HEAD` of the source checkout.
    pub fn read(source: &Git<'_>) -> Result<Self> {
        Ok(Self {
            short_sha: source.head_short_sha()?,
            message: source.head_message()?,
        })
    }

    /// Message of the publish commit.
    pub fn commit_message(&self) -> String {
        let message = self.message.trim();
        if message.is_empty() {
            format!("Publish {}", self.short_sha)
        } else {
            format!("Publish {}\n\n{}", self.short_sha, message)
        }
    }
}

/// Copies `artifact` into `checkout`, skipping `.git` entries at any depth.
///
/// Returns the number of files copied.
pub fn mirror(artifact: &Path, checkout: &Path) -> Result<usize> {
    let mut copied = 0;

    let walker = WalkDir::new(artifact)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != GIT_DIR);

    for entry in walker {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(artifact)
            .map_err(|e| Error::configuration(e.to_string()))?;
        let target = checkout.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            copied += 1;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    let link = fs::read_link(source)?;
    if target.symlink_metadata().is_ok() {
        fs::remove_file(target)?;
    }
    std::os::unix::fs::symlink(link, target)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target)?;
    Ok(())
}

/// Produces exactly one new commit holding the artifact's current content.
///
/// The commit is created even when the tree did not change, so every publish
/// leaves a record tying the branch to a source revision.
pub fn commit(git: &Git<'_>, artifact: &Path, revision: &SourceRevision) -> Result<()> {
    info!("Cleaning repo");
    git.remove_all()?;

    info!("Copying files");
    let copied = mirror(artifact, git.dir())?;
    debug!("Copied {} file(s) from {}", copied, artifact.display());

    info!("Committing");
    git.add_all()?;
    git.commit_allow_empty(&revision.commit_message())
}
