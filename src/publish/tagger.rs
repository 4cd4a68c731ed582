//! Release tagger: stamps the freshly published branch tip on tag events.

use log::{error, info};

use crate::env::{EventKind, InvocationContext};
use crate::error::{Error, Result};
use crate::git::Git;
use crate::request::PublishRequest;

/// Name of the release tag for a triggering tag.
pub fn release_tag_name(tag_prefix: &str, ref_tag: &str) -> String {
    format!("{}{}", tag_prefix, ref_tag)
}

/// Tags the published branch tip and pushes the tag.
///
/// Returns `None` when the invocation was not a tag event. Must only be
/// called after the branch push succeeded; a failure here leaves the
/// published branch as it is.
pub fn tag_release(
    git: &Git<'_>,
    context: &InvocationContext,
    request: &PublishRequest,
) -> Result<Option<String>> {
    if context.event_kind != EventKind::Tag {
        info!("Workflow was not a tag, so not tagging with prefix");
        return Ok(None);
    }

    let ref_tag = match context.ref_tag() {
        Some(tag) if !tag.is_empty() => tag,
        _ => return Err(Error::configuration("Tag event without a tag in GITHUB_REF")),
    };
    let tag = release_tag_name(&request.tag_prefix, ref_tag);
    info!("Publishing tag '{}'", tag);

    let message = request
        .annotate_tag
        .then(|| format!("Release {}", tag));
    let result = git
        .tag(&tag, &request.branch, message.as_deref())
        .and_then(|()| git.push_tag(&tag));

    match result {
        Ok(()) => Ok(Some(tag)),
        Err(e) => {
            error!(
                "Tagging failed; branch '{}' remains published",
                request.branch
            );
            Err(Error::Tag {
                tag,
                message: e.to_string(),
            })
        }
    }
}
