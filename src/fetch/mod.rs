//! Materializing a normalized locator onto local storage.
//!
//! [`Fetcher`] is the seam the scaffold pipeline uses to obtain a module or a
//! template folder. [`SourceFetcher`] handles the two kinds of locator a
//! scaffold supports:
//!
//! - **git**: the repository is cloned into a scratch directory and the
//!   requested `//subdir` (or the whole checkout, minus `.git`) is copied to
//!   the destination.
//! - **file://**: the directory is copied to the destination.
//!
//! Any other scheme is rejected with [`ScaffoldError::FetchFailed`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tempfile::TempDir;

use crate::core::ScaffoldError;
use crate::git;
use crate::source::{SourceKind, SourceUrl};
use crate::utils::fs::copy_dir;

/// Copies the content a locator points at into a local directory.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Materialize `source` into `destination`, which is created if missing.
    async fn fetch(&self, source: &SourceUrl, destination: &Path) -> Result<()>;
}

/// [`Fetcher`] for git repositories and local directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceFetcher;

impl SourceFetcher {
    pub fn new() -> Self {
        Self
    }

    async fn fetch_git(&self, source: &SourceUrl, destination: &Path) -> Result<()> {
        git::ensure_git_available()?;

        let scratch = TempDir::new().context("Failed to create scratch directory for clone")?;
        let checkout = scratch.path().join("checkout");
        let reference = source.ref_param();

        git::clone_repository(&source.clone_url(), reference.as_deref(), &checkout).await?;

        let content = match source.subdir() {
            Some(sub) => checkout.join(sub),
            None => checkout,
        };
        if !content.is_dir() {
            return Err(fetch_failed(source, "subdirectory not found in repository").into());
        }

        copy_dir(&content, destination)
    }

    fn fetch_local(&self, source: &SourceUrl, destination: &Path) -> Result<()> {
        let path = source
            .local_path()
            .ok_or_else(|| fetch_failed(source, "not a local filesystem path"))?;
        if !path.is_dir() {
            return Err(fetch_failed(source, format!("{} is not a directory", path.display())).into());
        }

        copy_dir(&path, destination)
    }
}

#[async_trait]
impl Fetcher for SourceFetcher {
    async fn fetch(&self, source: &SourceUrl, destination: &Path) -> Result<()> {
        tracing::debug!(target: "source", "Fetching {} into {}", source, destination.display());

        let fetched = match source.kind() {
            SourceKind::Git => self.fetch_git(source, destination).await,
            SourceKind::Local => self.fetch_local(source, destination),
            SourceKind::Unsupported => Err(fetch_failed(
                source,
                format!("unsupported scheme '{}'", source.url().scheme()),
            )
            .into()),
        };
        fetched.with_context(|| format!("Failed to download {source}"))
    }
}

fn fetch_failed(source: &SourceUrl, reason: impl Into<String>) -> ScaffoldError {
    ScaffoldError::FetchFailed {
        locator: source.to_string(),
        reason: reason.into(),
    }
}
