//! Git operations used to fetch module and template repositories.
//!
//! Fetches shell out to the system `git` binary instead of linking a git
//! library, so users' credential helpers, SSH agents and `insteadOf` rewrites
//! apply exactly as they do on the command line.
//!
//! A reference that names a branch or tag is fetched with a shallow
//! `--branch` clone. A commit SHA cannot be passed to `--branch`, so those
//! are cloned with history and checked out afterwards.

pub mod command_builder;

pub use command_builder::{GitCommand, GitCommandOutput};

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::ScaffoldError;

/// Name of the git executable on this platform.
#[must_use]
pub const fn git_command() -> &'static str {
    if cfg!(windows) { "git.exe" } else { "git" }
}

/// Fail with [`ScaffoldError::GitNotFound`] when git is not on `PATH`.
pub fn ensure_git_available() -> Result<()> {
    which::which(git_command()).map_err(|_| ScaffoldError::GitNotFound)?;
    Ok(())
}

/// Whether `reference` looks like an abbreviated or full commit SHA.
#[must_use]
pub fn is_commit_sha(reference: &str) -> bool {
    (7..=40).contains(&reference.len()) && reference.chars().all(|c| c.is_ascii_hexdigit())
}

/// Clone `url` into `target`, checked out at `reference` when given.
pub async fn clone_repository(url: &str, reference: Option<&str>, target: &Path) -> Result<()> {
    match reference {
        Some(sha) if is_commit_sha(sha) => {
            GitCommand::clone_full(url, target)
                .with_context(url)
                .execute_success()
                .await
                .with_context(|| format!("Failed to clone {url}"))?;
            GitCommand::checkout(target, sha)
                .with_context(url)
                .execute_success()
                .await
                .with_context(|| format!("Failed to check out {sha} in {url}"))?;
        }
        _ => {
            GitCommand::clone_shallow(url, reference, target)
                .with_context(url)
                .execute_success()
                .await
                .with_context(|| format!("Failed to clone {url}"))?;
        }
    }

    tracing::debug!(target: "git", "Cloned {} into {}", url, target.display());
    Ok(())
}
