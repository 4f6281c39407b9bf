//! Module and template source locators.
//!
//! A locator is the string a user passes to point at a module or template:
//! a git URL, a GitHub shorthand, an SCP-style SSH address or a local
//! directory. This module normalizes those into a [`SourceUrl`], the canonical
//! fetchable form, and resolves the final locator a scaffold points at.
//!
//! # Normalization
//!
//! | Input                                       | Canonical form                                      |
//! |---------------------------------------------|-----------------------------------------------------|
//! | `git::https://host/org/repo//sub?ref=v1`    | unchanged                                           |
//! | `github.com/org/repo//sub?ref=v1`           | `git::https://github.com/org/repo.git//sub?ref=v1`  |
//! | `git@host:org/repo.git//sub`                | `git::ssh://git@host/org/repo.git//sub`             |
//! | `https://host/archive.zip`                  | unchanged                                           |
//! | `./modules/vpc`, `/abs/path`                | `file:///<absolute path>`                           |
//!
//! A `//` in the path separates the repository from a subdirectory inside it,
//! and the `ref` query parameter carries the version to check out.
//!
//! # Submodules
//!
//! - [`rewrite`] - the `git::<scheme>://<host><path>` grammar and the SSH rewrite
//! - [`resolver`] - latest-release pinning and rewrite policy for a run

pub mod resolver;
pub mod rewrite;

pub use resolver::{ResolvedSource, SourceResolver};
pub use rewrite::{GitSourceParts, SourceScheme, SourceUrlType, parse_git_source};

use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::constants::REF_QUERY_PARAM;
use crate::core::ScaffoldError;

/// How a normalized locator is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Cloned with git
    Git,
    /// Copied from the local filesystem
    Local,
    /// Anything else (archives, object stores)
    Unsupported,
}

/// A normalized, fetchable locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    raw: String,
    getter: Option<String>,
    url: Url,
}

impl SourceUrl {
    /// Normalize `raw`, resolving relative filesystem paths against `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::SourceParse`] for an empty locator, a malformed
    /// URL or a GitHub shorthand without owner and repository.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::path::Path;
    /// use tgscaffold_cli::source::SourceUrl;
    ///
    /// let source = SourceUrl::parse("github.com/org/repo//modules/vpc", Path::new("/")).unwrap();
    /// assert_eq!(source.to_string(), "git::https://github.com/org/repo.git//modules/vpc");
    /// assert_eq!(source.subdir().as_deref(), Some("modules/vpc"));
    /// ```
    pub fn parse(raw: &str, working_dir: &Path) -> Result<Self, ScaffoldError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(parse_error(raw, "locator is empty"));
        }

        let (forced_getter, rest) = split_forced_getter(trimmed);
        let (detected_getter, url) = detect(raw, rest, working_dir)?;

        Ok(Self {
            raw: raw.to_string(),
            getter: forced_getter.map(str::to_string).or(detected_getter),
            url,
        })
    }

    /// The locator exactly as supplied.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Forced getter prefix such as `git`, if any.
    #[must_use]
    pub fn getter(&self) -> Option<&str> {
        self.getter.as_deref()
    }

    /// The URL without the getter prefix.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host of the URL, if it has a non-empty one.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.url.host_str().filter(|host| !host.is_empty())
    }

    /// How this locator is fetched.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        let scheme = self.url.scheme();
        if self.getter.as_deref() == Some("git") || scheme == "ssh" || scheme == "git" {
            return SourceKind::Git;
        }
        if scheme == "file" {
            return SourceKind::Local;
        }
        if (scheme == "https" || scheme == "http") && self.root().url.path().ends_with(".git") {
            return SourceKind::Git;
        }
        SourceKind::Unsupported
    }

    /// Value of the `ref` query parameter, when present and non-empty.
    #[must_use]
    pub fn ref_param(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == REF_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    /// Copy of this locator with `ref=<reference>` appended to the query.
    #[must_use]
    pub fn with_ref(&self, reference: &str) -> Self {
        let mut pinned = self.clone();
        pinned.url.query_pairs_mut().append_pair(REF_QUERY_PARAM, reference);
        pinned
    }

    /// The repository root: no `//subdir` and no query.
    #[must_use]
    pub fn root(&self) -> Self {
        let mut root = self.clone();
        root.url.set_query(None);
        let path = root.url.path().to_string();
        if let Some((base, _)) = path.split_once("//") {
            root.url.set_path(base);
        }
        root
    }

    /// Subdirectory after `//` in the path, if any.
    #[must_use]
    pub fn subdir(&self) -> Option<String> {
        self.url
            .path()
            .split_once("//")
            .map(|(_, sub)| sub.trim_matches('/').to_string())
            .filter(|sub| !sub.is_empty())
    }

    /// Owner and repository name from the first two path segments.
    ///
    /// A trailing `.git` is removed from the repository name.
    #[must_use]
    pub fn owner_and_repo(&self) -> Option<(String, String)> {
        let root = self.root();
        let mut segments = root.url.path_segments()?.filter(|segment| !segment.is_empty());
        let owner = segments.next()?.to_string();
        let repo = segments.next()?.trim_end_matches(".git").to_string();
        if repo.is_empty() {
            return None;
        }
        Some((owner, repo))
    }

    /// URL handed to `git clone`: the repository root without getter prefix.
    #[must_use]
    pub fn clone_url(&self) -> String {
        self.root().url.to_string()
    }

    /// Local directory of a `file://` locator, including its subdirectory.
    #[must_use]
    pub fn local_path(&self) -> Option<PathBuf> {
        let base = self.root().url.to_file_path().ok()?;
        Some(match self.subdir() {
            Some(sub) => base.join(sub),
            None => base,
        })
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.getter {
            Some(getter) => write!(f, "{getter}::{}", self.url),
            None => write!(f, "{}", self.url),
        }
    }
}

fn parse_error(raw: &str, reason: impl Into<String>) -> ScaffoldError {
    ScaffoldError::SourceParse {
        locator: raw.to_string(),
        reason: reason.into(),
    }
}

/// Split a `getter::rest` prefix; the getter is alphanumeric.
fn split_forced_getter(locator: &str) -> (Option<&str>, &str) {
    match locator.split_once("::") {
        Some((getter, rest))
            if !getter.is_empty()
                && !rest.is_empty()
                && getter.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            (Some(getter), rest)
        }
        _ => (None, locator),
    }
}

fn detect(raw: &str, rest: &str, working_dir: &Path) -> Result<(Option<String>, Url), ScaffoldError> {
    if rest.starts_with("github.com/") {
        return detect_github(raw, rest).map(|url| (Some("git".to_string()), url));
    }

    if let Some(url) = detect_scp_like(raw, rest)? {
        return Ok((Some("git".to_string()), url));
    }

    if let Ok(url) = Url::parse(rest) {
        // Single-letter schemes are Windows drive letters
        if url.scheme().len() > 1 {
            return Ok((None, url));
        }
    }

    let path = Path::new(rest);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    };
    let url = Url::from_file_path(&absolute)
        .map_err(|()| parse_error(raw, format!("{} is not an absolute path", absolute.display())))?;
    Ok((None, url))
}

/// `github.com/org/repo[/sub...][//sub][?query]`
fn detect_github(raw: &str, rest: &str) -> Result<Url, ScaffoldError> {
    let (location, query) = match rest.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (rest, None),
    };
    let (repo_part, explicit_subdir) = match location.split_once("//") {
        Some((repo, sub)) => (repo, Some(sub)),
        None => (location, None),
    };

    let parts: Vec<&str> = repo_part.split('/').collect();
    if parts.len() < 3 || parts[1].is_empty() || parts[2].is_empty() {
        return Err(parse_error(raw, "GitHub URLs should be github.com/username/repo"));
    }

    let repo = parts[2].trim_end_matches(".git");
    let mut canonical = format!("https://{}/{}/{}.git", parts[0], parts[1], repo);

    let mut subdir: Vec<&str> = parts[3..].iter().copied().filter(|p| !p.is_empty()).collect();
    if let Some(sub) = explicit_subdir {
        subdir.push(sub);
    }
    if !subdir.is_empty() {
        canonical.push_str("//");
        canonical.push_str(&subdir.join("/"));
    }
    if let Some(query) = query {
        canonical.push('?');
        canonical.push_str(query);
    }

    Url::parse(&canonical).map_err(|e| parse_error(raw, e.to_string()))
}

/// `user@host:path` without a scheme.
fn detect_scp_like(raw: &str, rest: &str) -> Result<Option<Url>, ScaffoldError> {
    if rest.contains("://") {
        return Ok(None);
    }
    let Some((user_host, path)) = rest.split_once(':') else {
        return Ok(None);
    };
    if !user_host.contains('@') || user_host.contains('/') || path.is_empty() {
        return Ok(None);
    }

    let canonical = format!("ssh://{}/{}", user_host, path.trim_start_matches('/'));
    Url::parse(&canonical).map(Some).map_err(|e| parse_error(raw, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(raw: &str) -> SourceUrl {
        SourceUrl::parse(raw, Path::new("/work")).unwrap()
    }

    #[test]
    fn test_forced_getter_is_kept_verbatim() {
        let source = parse("git::https://github.com/org/repo//modules/x");
        assert_eq!(source.getter(), Some("git"));
        assert_eq!(source.to_string(), "git::https://github.com/org/repo//modules/x");
        assert_eq!(source.kind(), SourceKind::Git);
    }

    #[test]
    fn test_github_shorthand() {
        let source = parse("github.com/org/repo");
        assert_eq!(source.to_string(), "git::https://github.com/org/repo.git");

        let source = parse("github.com/org/repo//modules/x?ref=v1.0.0");
        assert_eq!(source.to_string(), "git::https://github.com/org/repo.git//modules/x?ref=v1.0.0");
        assert_eq!(source.ref_param().as_deref(), Some("v1.0.0"));

        let source = parse("github.com/org/repo/modules/x");
        assert_eq!(source.to_string(), "git::https://github.com/org/repo.git//modules/x");
    }

    #[test]
    fn test_github_shorthand_requires_owner_and_repo() {
        let err = SourceUrl::parse("github.com/org", Path::new("/")).unwrap_err();
        assert!(matches!(err, ScaffoldError::SourceParse { .. }));
    }

    #[test]
    fn test_scp_like_ssh() {
        let source = parse("git@github.com:org/repo.git//modules/x");
        assert_eq!(source.to_string(), "git::ssh://git@github.com/org/repo.git//modules/x");
        assert_eq!(source.host(), Some("github.com"));
        assert_eq!(source.kind(), SourceKind::Git);
    }

    #[test]
    fn test_plain_url_without_getter() {
        let source = parse("https://example.com/archive.zip");
        assert_eq!(source.getter(), None);
        assert_eq!(source.to_string(), "https://example.com/archive.zip");
        assert_eq!(source.kind(), SourceKind::Unsupported);

        let source = parse("https://example.com/org/repo.git");
        assert_eq!(source.kind(), SourceKind::Git);
    }

    #[test]
    fn test_local_paths_become_file_urls() {
        let temp = TempDir::new().unwrap();
        let source = SourceUrl::parse("modules/vpc", temp.path()).unwrap();
        assert_eq!(source.kind(), SourceKind::Local);
        assert_eq!(source.local_path().unwrap(), temp.path().join("modules/vpc"));

        let absolute = temp.path().join("abs");
        let source = SourceUrl::parse(absolute.to_str().unwrap(), Path::new("/ignored")).unwrap();
        assert_eq!(source.local_path().unwrap(), absolute);
    }

    #[test]
    fn test_empty_locator_is_an_error() {
        assert!(SourceUrl::parse("   ", Path::new("/")).is_err());
    }

    #[test]
    fn test_ref_param_and_with_ref() {
        let source = parse("git::https://github.com/org/repo.git//x");
        assert_eq!(source.ref_param(), None);

        let pinned = source.with_ref("v1.2.3");
        assert_eq!(pinned.ref_param().as_deref(), Some("v1.2.3"));
        assert_eq!(pinned.to_string(), "git::https://github.com/org/repo.git//x?ref=v1.2.3");

        let empty = parse("git::https://github.com/org/repo.git?ref=");
        assert_eq!(empty.ref_param(), None);
    }

    #[test]
    fn test_root_subdir_and_owner() {
        let source = parse("git::https://github.com/org/repo.git//modules/x?ref=v1");
        assert_eq!(source.root().to_string(), "git::https://github.com/org/repo.git");
        assert_eq!(source.subdir().as_deref(), Some("modules/x"));
        assert_eq!(source.owner_and_repo(), Some(("org".to_string(), "repo".to_string())));
        assert_eq!(source.clone_url(), "https://github.com/org/repo.git");
    }

    #[test]
    fn test_owner_and_repo_missing() {
        let source = parse("git::https://github.com/org");
        assert_eq!(source.owner_and_repo(), None);
    }
}
