//! End-to-end tests for the `publish` command against a real local remote.
//!
//! Each test builds a bare repository reachable through a `file://` server
//! URL, a source checkout on `main` and an artifact folder, then runs the
//! binary the way a CI job would. Tests return early when `git` is missing.

mod common;
use common::prelude::*;

#[test]
fn test_first_publish_creates_orphan_branch() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new()
        .with_artifact("mod.js", "export {};\n")
        .with_artifact("types/mod.d.ts", "export {};\n");

    fixture
        .publish()
        .arg("--branch")
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Published"));

    let files = fixture.remote_git(&["ls-tree", "-r", "--name-only", "build"]);
    assert_eq!(files.lines().collect::<Vec<_>>(), vec!["mod.js", "types/mod.d.ts"]);

    // Orphan: a single root commit, unrelated to the source history
    assert_eq!(fixture.remote_git(&["rev-list", "--count", "build"]), "1");
    assert_eq!(fixture.remote_git(&["log", "-1", "--format=%P", "build"]), "");

    let message = fixture.remote_git(&["log", "-1", "--format=%B", "build"]);
    assert!(message.starts_with(&format!("Publish {}", fixture.source_short_sha())));
    assert!(message.contains("Add the x export"));

    let author = fixture.remote_git(&["log", "-1", "--format=%an <%ae>", "build"]);
    assert_eq!(author, "github-actions <github-actions@github.com>");
}

#[test]
fn test_republish_keeps_history_and_tree() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new().with_artifact("mod.js", "export {};\n");

    fixture.publish().arg("--branch").arg("build").assert().success();
    let first = fixture.remote_git(&["rev-parse", "build"]);

    fixture.publish().arg("--branch").arg("build").assert().success();
    let second = fixture.remote_git(&["rev-parse", "build"]);

    assert_ne!(first, second);
    assert_eq!(fixture.remote_git(&["rev-list", "--count", "build"]), "2");
    assert_eq!(fixture.remote_git(&["rev-parse", "build^"]), first);
    // Same artifact, same tree: the second commit is an allowed empty commit
    assert_eq!(
        fixture.remote_git(&["rev-parse", "build^{tree}"]),
        fixture.remote_git(&["rev-parse", "build~1^{tree}"])
    );
}

#[test]
fn test_stale_files_are_removed() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new()
        .with_artifact("a.js", "a\n")
        .with_artifact("old/b.js", "b\n");

    fixture.publish().arg("--branch").arg("build").assert().success();
    fixture.remove_artifact("old/b.js");
    fixture.write_artifact("c.js", "c\n");
    fixture.publish().arg("--branch").arg("build").assert().success();

    let files = fixture.remote_git(&["ls-tree", "-r", "--name-only", "build"]);
    assert_eq!(files.lines().collect::<Vec<_>>(), vec!["a.js", "c.js"]);
}

#[test]
fn test_git_metadata_in_artifact_is_not_published() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new()
        .with_artifact("mod.js", "export {};\n")
        .with_artifact(".git/config", "[core]\n");

    fixture.publish().arg("--branch").arg("build").assert().success();

    let files = fixture.remote_git(&["ls-tree", "-r", "--name-only", "build"]);
    assert_eq!(files, "mod.js");
}

#[test]
fn test_ignore_file_in_artifact_does_not_hide_files() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new()
        .with_artifact("mod.js", "export {};\n")
        .with_artifact(".gitignore", "*.js\n");

    fixture.publish().arg("--branch").arg("build").assert().success();

    let files = fixture.remote_git(&["ls-tree", "-r", "--name-only", "build"]);
    assert_eq!(files.lines().collect::<Vec<_>>(), vec![".gitignore", "mod.js"]);
}

#[test]
fn test_identity_override() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new().with_artifact("mod.js", "export {};\n");

    fixture
        .publish()
        .arg("--branch")
        .arg("build")
        .arg("--git-user-name")
        .arg("Release Bot")
        .arg("--git-user-email")
        .arg("bot@example.com")
        .assert()
        .success();

    let author = fixture.remote_git(&["log", "-1", "--format=%an <%ae>", "build"]);
    assert_eq!(author, "Release Bot <bot@example.com>");
}

#[test]
fn test_tag_event_pushes_prefixed_tag() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new().with_artifact("mod.js", "export {};\n");

    fixture
        .publish_on_tag("1.2.0")
        .arg("--branch")
        .arg("build")
        .arg("--tag-prefix")
        .arg("build-")
        .assert()
        .success()
        .stdout(predicate::str::contains("tagged build-1.2.0"));

    assert_eq!(
        fixture.remote_git(&["rev-parse", "build-1.2.0^{commit}"]),
        fixture.remote_git(&["rev-parse", "build"])
    );
}

#[test]
fn test_push_event_does_not_tag() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new().with_artifact("mod.js", "export {};\n");

    fixture
        .publish()
        .arg("--branch")
        .arg("build")
        .arg("--tag-prefix")
        .arg("build-")
        .assert()
        .success();

    assert_eq!(fixture.remote_git(&["tag", "--list"]), "");
}

#[test]
fn test_same_branch_is_a_configuration_error() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new().with_artifact("mod.js", "export {};\n");

    fixture
        .publish()
        .arg("--branch")
        .arg("main")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[FAIL] Nothing was published"))
        .stderr(predicate::str::contains("same as the output branch"));

    assert!(!fixture.remote_has_ref("refs/heads/main"));
}

#[test]
fn test_prefixed_tag_is_a_configuration_error() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new().with_artifact("mod.js", "export {};\n");

    fixture
        .publish_on_tag("build-1.2.0")
        .arg("--branch")
        .arg("build")
        .arg("--tag-prefix")
        .arg("build-")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("starts with the tag prefix"));

    assert!(!fixture.remote_has_ref("refs/heads/build"));
}

#[test]
fn test_missing_artifact_folder() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new();
    std::fs::remove_dir(fixture.artifact_path()).unwrap();

    fixture
        .publish()
        .arg("--branch")
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Artifact folder not found"));
}

#[test]
fn test_artifact_folder_is_not_modified() {
    if !git_available() {
        return;
    }
    let fixture = PublishFixture::new().with_artifact("mod.js", "export {};\n");

    fixture.publish().arg("--branch").arg("build").assert().success();

    let entries: Vec<_> = std::fs::read_dir(fixture.artifact_path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("mod.js")]);
    // The scratch checkout is cleaned up
    assert_eq!(std::fs::read_dir(fixture.runner_temp()).unwrap().count(), 0);
}
