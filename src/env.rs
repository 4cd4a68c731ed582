//! # Invocation Environment
//!
//! Reads the CI environment once per invocation and turns it into an
//! immutable [`InvocationContext`]. Lookups go through [`Environment`] so the
//! same parsing runs against the real process environment and against fixed
//! maps in tests.
//!
//! | Variable | Use |
//! |---|---|
//! | `GITHUB_REF` | triggering ref, tag name extraction |
//! | `GITHUB_EVENT_NAME` | `tag` enables tagging and the prefix guard |
//! | `GITHUB_REPOSITORY` | `owner/name` of the remote (required) |
//! | `RUNNER_TEMP` | parent of the private scratch directory (required) |
//! | `GITHUB_SERVER_URL` | remote host, defaults to `https://github.com` |
//! | `GITHUB_WORKSPACE` | the invoking source checkout, defaults to the current directory |

use std::collections::HashMap;
use std::path::PathBuf;

use url::Url;

use crate::defaults;
use crate::error::{Error, Result};

/// Prefix of a fully qualified tag ref.
const TAG_REF_PREFIX: &str = "refs/tags/";

/// Named environment lookups with fail-fast access to required variables.
pub struct Environment {
    lookup: Box<dyn Fn(&str) -> Option<String>>,
}

impl Environment {
    /// Reads from the current process environment.
    pub fn process() -> Self {
        Self {
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Reads from a fixed set of pairs, ignoring the process environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            lookup: Box::new(move |name| map.get(name).cloned()),
        }
    }

    /// Returns the variable's value, treating an empty value as unset.
    pub fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|value| !value.is_empty())
    }

    /// Returns the variable's value or fails with [`Error::MissingEnv`].
    pub fn require(&self, name: &str) -> Result<String> {
        self.get(name).ok_or_else(|| Error::MissingEnv {
            name: name.to_string(),
        })
    }
}

/// What triggered the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A tag event: the release tagger runs and the prefix guard applies.
    Tag,
    /// Anything else (push, pull request, manual dispatch, ...).
    Other,
}

impl EventKind {
    /// Classifies a `GITHUB_EVENT_NAME` value.
    pub fn from_event_name(name: Option<&str>) -> Self {
        match name {
            Some("tag") => EventKind::Tag,
            _ => EventKind::Other,
        }
    }
}

/// Read-only facts about the current invocation.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// The triggering ref, e.g. `refs/tags/1.2.0`.
    pub ref_name: Option<String>,
    pub event_kind: EventKind,
    /// `owner/name` of the repository being published to.
    pub repository: String,
    pub server_url: Url,
    /// Parent directory for the private scratch checkout.
    pub scratch_root: PathBuf,
    /// The invoking source checkout.
    pub workspace: PathBuf,
}

impl InvocationContext {
    /// Builds the context from an [`Environment`], failing fast on missing
    /// required variables.
    pub fn from_environment(env: &Environment) -> Result<Self> {
        let repository = env.require("GITHUB_REPOSITORY")?;
        let scratch_root = PathBuf::from(env.require("RUNNER_TEMP")?);

        let server = env
            .get("GITHUB_SERVER_URL")
            .unwrap_or_else(|| defaults::SERVER_URL.to_string());
        let server_url = Url::parse(&server)?;

        let workspace = match env.get("GITHUB_WORKSPACE") {
            Some(path) => PathBuf::from(path),
            None => std::env::current_dir()?,
        };

        Ok(Self {
            ref_name: env.get("GITHUB_REF"),
            event_kind: EventKind::from_event_name(env.get("GITHUB_EVENT_NAME").as_deref()),
            repository,
            server_url,
            scratch_root,
            workspace,
        })
    }

    /// The triggering tag name with `refs/tags/` stripped.
    ///
    /// Only meaningful for tag events; other refs are returned unchanged.
    pub fn ref_tag(&self) -> Option<&str> {
        self.ref_name
            .as_deref()
            .map(|r| r.strip_prefix(TAG_REF_PREFIX).unwrap_or(r))
    }

    /// URL of the remote repository, e.g. `https://github.com/owner/name`.
    pub fn remote_url(&self) -> Result<String> {
        let mut base = self.server_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let url = base.join(self.repository.trim_matches('/'))?;
        Ok(url.to_string())
    }
}
