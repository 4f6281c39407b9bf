//! Latest-release lookup for module repositories.
//!
//! When a module locator carries no `ref`, the scaffold pins it to the newest
//! published release so the generated configuration is reproducible. The
//! lookup sits behind the [`ReleaseLookup`] trait so the resolver can be driven
//! by a fake in tests.
//!
//! [`GitHubReleaseLookup`] queries the GitHub REST API:
//!
//! ```text
//! GET https://api.github.com/repos/{owner}/{repo}/releases/latest      (github.com)
//! GET https://{host}/api/v3/repos/{owner}/{repo}/releases/latest       (GitHub Enterprise)
//! ```
//!
//! and returns the release's `tag_name`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;

use crate::constants::RELEASE_LOOKUP_TIMEOUT;
use crate::core::ScaffoldError;

const GITHUB_HOST: &str = "github.com";
const GITHUB_API: &str = "https://api.github.com";

/// Finds the newest release tag of a repository.
#[async_trait]
pub trait ReleaseLookup: Send + Sync {
    /// Tag name of the latest release of `owner/repo` on `host`.
    async fn latest_tag(&self, host: &str, owner: &str, repo: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// [`ReleaseLookup`] backed by the GitHub REST API.
pub struct GitHubReleaseLookup {
    client: reqwest::Client,
    token: Option<String>,
}

impl GitHubReleaseLookup {
    /// Create a lookup, authenticating with `token` when one is given.
    pub fn new(token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(RELEASE_LOOKUP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// API endpoint for the latest release of `owner/repo` on `host`.
    #[must_use]
    pub fn release_url(host: &str, owner: &str, repo: &str) -> String {
        let api = if host == GITHUB_HOST {
            GITHUB_API.to_string()
        } else {
            format!("https://{host}/api/v3")
        };
        format!("{api}/repos/{owner}/{repo}/releases/latest")
    }
}

#[async_trait]
impl ReleaseLookup for GitHubReleaseLookup {
    async fn latest_tag(&self, host: &str, owner: &str, repo: &str) -> Result<String> {
        let url = Self::release_url(host, owner, repo);
        let failure = |reason: String| ScaffoldError::ReleaseLookupFailed {
            host: host.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            reason,
        };

        tracing::debug!(target: "source", "Looking up latest release: {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| failure(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failure(format!("HTTP {status}")).into());
        }

        let release: Release = response.json().await.map_err(|e| failure(e.to_string()))?;
        if release.tag_name.is_empty() {
            return Err(failure("release has an empty tag name".to_string()).into());
        }

        Ok(release.tag_name)
    }
}
