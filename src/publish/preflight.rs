//! Preflight guard: invocation-time checks that run before anything is
//! cloned, fetched or pushed.

use crate::env::{EventKind, InvocationContext};
use crate::error::{Error, Result};
use crate::request::PublishRequest;

/// Validates the invocation against the source checkout's current branch.
pub fn check(
    context: &InvocationContext,
    request: &PublishRequest,
    current_branch: &str,
) -> Result<()> {
    if context.event_kind == EventKind::Tag {
        check_tag(context.ref_tag().unwrap_or_default(), &request.tag_prefix)?;
    }
    check_branch(current_branch, &request.branch)
}

/// A release tag produced by this tool must never trigger it again.
pub fn check_tag(ref_tag: &str, tag_prefix: &str) -> Result<()> {
    if ref_tag.is_empty() {
        return Err(Error::Configuration {
            message: "Tag event without a tag in GITHUB_REF".to_string(),
            hint: Some("Expected GITHUB_REF to be refs/tags/<tag>".to_string()),
        });
    }
    if ref_tag.starts_with(tag_prefix) {
        return Err(Error::Configuration {
            message: format!(
                "Tag '{}' starts with the tag prefix '{}'",
                ref_tag, tag_prefix
            ),
            hint: Some(
                "The workflow is probably configured incorrectly: this step shouldn't run on tags with the tag prefix"
                    .to_string(),
            ),
        });
    }
    Ok(())
}

/// The target branch must not be the branch being built.
pub fn check_branch(current_branch: &str, target_branch: &str) -> Result<()> {
    if current_branch == target_branch {
        return Err(Error::Configuration {
            message: format!(
                "The current branch ({}) is the same as the output branch ({})",
                current_branch, target_branch
            ),
            hint: Some(
                "Publishing would overwrite the source branch; is the workflow running on the output branch?"
                    .to_string(),
            ),
        });
    }
    Ok(())
}
