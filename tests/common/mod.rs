//! Shared test utilities for integration and E2E tests.
//!
//! Provides a fixture holding everything a publish needs on the local
//! machine: a bare "remote" repository served over `file://`, a source
//! checkout with one commit on `main`, an artifact folder and a runner temp
//! directory.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let fixture = PublishFixture::new().with_artifact("mod.js", "export {}");
//!     fixture.publish().arg("--branch").arg("build").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::git_available;
    pub use super::PublishFixture;
}

/// Repository name every fixture publishes to.
#[allow(dead_code)]
pub const REPOSITORY: &str = "owner/name";

/// Whether a `git` executable can be run.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Runs git in `dir` and returns trimmed stdout, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A local remote, source checkout and artifact folder.
#[allow(dead_code)]
pub struct PublishFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl PublishFixture {
    /// Creates the bare remote, a source checkout on `main` with one commit,
    /// an empty artifact folder and the runner temp directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let fixture = Self { temp_dir };

        let remote = fixture.remote_path();
        std::fs::create_dir_all(&remote).expect("Failed to create remote directory");
        git(&remote, &["init", "-q", "--bare"]);

        let source = fixture.source_path();
        std::fs::create_dir_all(&source).expect("Failed to create source directory");
        git(&source, &["init", "-q"]);
        git(&source, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&source, &["config", "user.name", "Source Author"]);
        git(&source, &["config", "user.email", "author@example.com"]);
        fixture
            .temp_dir
            .child("source/main.ts")
            .write_str("export const x = 1;\n")
            .expect("Failed to write source file");
        git(&source, &["add", "."]);
        git(&source, &["commit", "-q", "-m", "Add the x export"]);

        std::fs::create_dir_all(fixture.artifact_path()).expect("Failed to create artifact dir");
        std::fs::create_dir_all(fixture.runner_temp()).expect("Failed to create runner temp");
        fixture
    }

    /// Adds a file to the artifact folder.
    pub fn with_artifact(self, path: &str, content: &str) -> Self {
        self.write_artifact(path, content);
        self
    }

    pub fn write_artifact(&self, path: &str, content: &str) {
        self.temp_dir
            .child("dist")
            .child(path)
            .write_str(content)
            .expect("Failed to write artifact file");
    }

    pub fn remove_artifact(&self, path: &str) {
        std::fs::remove_file(self.artifact_path().join(path)).expect("Failed to remove artifact");
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn server_root(&self) -> PathBuf {
        self.path().join("server")
    }

    pub fn remote_path(&self) -> PathBuf {
        self.server_root().join(REPOSITORY)
    }

    pub fn source_path(&self) -> PathBuf {
        self.path().join("source")
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.path().join("dist")
    }

    pub fn runner_temp(&self) -> PathBuf {
        self.path().join("runner")
    }

    /// `file://` URL standing in for `GITHUB_SERVER_URL`.
    pub fn server_url(&self) -> String {
        url::Url::from_directory_path(self.server_root())
            .expect("Fixture path should be absolute")
            .to_string()
    }

    /// Runs git against the bare remote.
    pub fn remote_git(&self, args: &[&str]) -> String {
        git(&self.remote_path(), args)
    }

    /// Whether `refname` exists on the remote.
    pub fn remote_has_ref(&self, refname: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", refname])
            .current_dir(self.remote_path())
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Short id of the source checkout's `HEAD`.
    pub fn source_short_sha(&self) -> String {
        git(&self.source_path(), &["rev-parse", "--short", "HEAD"])
    }

    /// A `publish` command with a push-event environment pointing at this
    /// fixture. Every variable the tool reads is set explicitly so the
    /// surrounding CI environment cannot leak in.
    pub fn publish(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("branch-publish");
        cmd.current_dir(self.source_path())
            .env("GITHUB_REPOSITORY", REPOSITORY)
            .env("GITHUB_SERVER_URL", self.server_url())
            .env("GITHUB_WORKSPACE", self.source_path())
            .env("RUNNER_TEMP", self.runner_temp())
            .env("GITHUB_EVENT_NAME", "push")
            .env("GITHUB_REF", "refs/heads/main")
            .env("GITHUB_TOKEN", "test-token")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never")
            .arg("publish")
            .arg(self.artifact_path())
            .arg("--retry-delay-ms")
            .arg("0");
        cmd
    }

    /// Like [`publish`](Self::publish), triggered by tag `tag`.
    pub fn publish_on_tag(&self, tag: &str) -> assert_cmd::Command {
        let mut cmd = self.publish();
        cmd.env("GITHUB_EVENT_NAME", "tag")
            .env("GITHUB_REF", format!("refs/tags/{}", tag));
        cmd
    }
}

impl Default for PublishFixture {
    fn default() -> Self {
        Self::new()
    }
}
