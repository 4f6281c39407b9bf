//! Resolution of the final module locator for a scaffold run.
//!
//! Two steps turn the user's module locator into the `sourceUrl` a template
//! sees. First, a locator without `ref` is pinned to the latest release; a
//! failed lookup is logged and the locator stays unpinned. Second, the pinned
//! locator is matched against the git source grammar and rewritten to SSH form
//! when `SourceUrlType` asks for it.
//!
//! The fetch always uses the pinned locator. The rewrite only changes what is
//! written into the generated files.

use anyhow::Result;
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;

use super::SourceUrl;
use super::rewrite::{SourceUrlType, apply_url_type, parse_git_source};
use crate::constants::{DEFAULT_GIT_SSH_USER, SOURCE_GIT_SSH_USER_VAR, SOURCE_URL_TYPE_VAR};
use crate::release::ReleaseLookup;

/// The module locator after pinning and rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Locator the module is fetched from
    pub pinned: SourceUrl,
    /// Locator written into the scaffold as `sourceUrl`
    pub source_url: String,
}

/// Pins and rewrites module locators.
pub struct SourceResolver<'a> {
    lookup: &'a dyn ReleaseLookup,
    working_dir: PathBuf,
}

impl<'a> SourceResolver<'a> {
    /// Create a resolver; relative local locators resolve against `working_dir`.
    pub fn new(lookup: &'a dyn ReleaseLookup, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            lookup,
            working_dir: working_dir.into(),
        }
    }

    /// Normalize `raw` without pinning or rewriting.
    pub fn normalize(&self, raw: &str) -> Result<SourceUrl> {
        Ok(SourceUrl::parse(raw, &self.working_dir)?)
    }

    /// Resolve the module locator `raw` using the rewrite variables in `vars`.
    ///
    /// # Errors
    ///
    /// Only an unparsable locator is fatal. Lookup failures and locators that
    /// do not match the git source grammar are logged.
    pub async fn resolve(&self, raw: &str, vars: &Map<String, JsonValue>) -> Result<ResolvedSource> {
        let source = self.normalize(raw)?;
        let pinned = self.pin_latest_release(source).await;
        let source_url = rewrite_for_output(&pinned.to_string(), vars);

        tracing::debug!(target: "source", "Module source resolved to {}", source_url);
        Ok(ResolvedSource { pinned, source_url })
    }

    async fn pin_latest_release(&self, source: SourceUrl) -> SourceUrl {
        if let Some(reference) = source.ref_param() {
            tracing::debug!(target: "source", "Using explicit ref {} for {}", reference, source);
            return source;
        }

        let Some(host) = source.host() else {
            tracing::debug!(target: "source", "No host in {}, skipping release lookup", source);
            return source;
        };
        let Some((owner, repo)) = source.owner_and_repo() else {
            tracing::debug!(target: "source", "No owner/repo in {}, skipping release lookup", source);
            return source;
        };

        match self.lookup.latest_tag(host, &owner, &repo).await {
            Ok(tag) => {
                tracing::info!(target: "source", "Using latest release {} of {}/{}", tag, owner, repo);
                source.with_ref(&tag)
            }
            Err(e) => {
                tracing::warn!(
                    target: "source",
                    "Failed to find latest release of {}/{}, leaving {} unpinned: {:#}",
                    owner,
                    repo,
                    source,
                    e
                );
                source
            }
        }
    }
}

/// Apply the `SourceUrlType` / `SourceGitSshUser` policy to `locator`.
#[must_use]
pub fn rewrite_for_output(locator: &str, vars: &Map<String, JsonValue>) -> String {
    let Some(parts) = parse_git_source(locator) else {
        tracing::warn!(target: "source", "Failed to parse module url {}, using it as-is", locator);
        return locator.to_string();
    };

    let url_type = var_text(vars, SOURCE_URL_TYPE_VAR)
        .map(|value| SourceUrlType::from_value(&value))
        .unwrap_or_default();
    let git_user = var_text(vars, SOURCE_GIT_SSH_USER_VAR)
        .unwrap_or_else(|| DEFAULT_GIT_SSH_USER.to_string());

    apply_url_type(locator, &parts, url_type, &git_user)
}

fn var_text(vars: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match vars.get(key)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}
