//! The `git::<scheme>://<host><path>` grammar and the HTTPS to SSH rewrite.
//!
//! Only locators that start with the literal `git::` getter are candidates. The
//! scheme runs up to the first `://` and may not contain `:`, the host runs up
//! to the next `/`, and the path is everything from that `/` on, including any
//! `//subdir` and query string.

use crate::constants::SOURCE_URL_TYPE_SSH;

const GIT_GETTER_PREFIX: &str = "git::";
const SCHEME_SEPARATOR: &str = "://";

/// Components of a locator matching the git source grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSourceParts {
    /// Scheme as written, e.g. `https`
    pub scheme: String,
    /// Host, possibly with `user@` and `:port`
    pub host: String,
    /// Path starting with `/`
    pub path: String,
}

/// Scheme family of a matched git locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceScheme {
    Https,
    Ssh,
    Undetermined,
}

/// Which form the final `sourceUrl` should take, from the `SourceUrlType` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceUrlType {
    #[default]
    GitHttps,
    GitSsh,
}

impl SourceUrlType {
    /// Anything other than `git-ssh` keeps the HTTPS form.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value == SOURCE_URL_TYPE_SSH {
            Self::GitSsh
        } else {
            Self::GitHttps
        }
    }
}

impl GitSourceParts {
    /// Scheme family of the matched locator.
    #[must_use]
    pub fn scheme_kind(&self) -> SourceScheme {
        match self.scheme.as_str() {
            "https" => SourceScheme::Https,
            "ssh" => SourceScheme::Ssh,
            _ => SourceScheme::Undetermined,
        }
    }

    /// SCP-style SSH form: `{user}@{host}:{path without leading /}`.
    #[must_use]
    pub fn to_ssh(&self, git_user: &str) -> String {
        let path = self.path.strip_prefix('/').unwrap_or(&self.path);
        format!("{git_user}@{}:{path}", self.host)
    }
}

/// Match `locator` against the git source grammar.
///
/// Returns `None` when the locator has no `git::` prefix or one of the
/// components is missing.
///
/// # Examples
///
/// ```rust
/// use tgscaffold_cli::source::parse_git_source;
///
/// let parts = parse_git_source("git::https://github.com/org/repo.git//modules/x?ref=v1").unwrap();
/// assert_eq!(parts.scheme, "https");
/// assert_eq!(parts.host, "github.com");
/// assert_eq!(parts.path, "/org/repo.git//modules/x?ref=v1");
///
/// assert!(parse_git_source("https://github.com/org/repo").is_none());
/// ```
#[must_use]
pub fn parse_git_source(locator: &str) -> Option<GitSourceParts> {
    let rest = locator.strip_prefix(GIT_GETTER_PREFIX)?;

    let scheme_end = rest.find(':')?;
    let (scheme, rest) = rest.split_at(scheme_end);
    if scheme.is_empty() {
        return None;
    }
    let rest = rest.strip_prefix(SCHEME_SEPARATOR)?;

    let host_end = rest.find('/')?;
    let (host, path) = rest.split_at(host_end);
    if host.is_empty() {
        return None;
    }

    Some(GitSourceParts {
        scheme: scheme.to_string(),
        host: host.to_string(),
        path: path.to_string(),
    })
}

/// Apply the requested URL form to an already matched locator.
///
/// Only an HTTPS locator with `git-ssh` requested is rewritten; every other
/// combination keeps `locator` unchanged.
#[must_use]
pub fn apply_url_type(
    locator: &str,
    parts: &GitSourceParts,
    url_type: SourceUrlType,
    git_user: &str,
) -> String {
    match (parts.scheme_kind(), url_type) {
        (SourceScheme::Https, SourceUrlType::GitSsh) => parts.to_ssh(git_user),
        _ => locator.to_string(),
    }
}
