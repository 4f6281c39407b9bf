//! Canonical formatting of generated HCL files.
//!
//! [`HclFormatter`] walks an output directory, checks each `*.hcl` file
//! parses, and rewrites it with [`format_hcl`]. Hidden directories and
//! `.terragrunt-cache` are never entered.

pub mod layout;

pub use layout::format_hcl;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::constants::{HCL_FILE_EXTENSION, TERRAGRUNT_CACHE_DIR};
use crate::core::ScaffoldError;

/// Rewrites configuration files under a directory into canonical form.
pub trait Formatter: Send + Sync {
    /// Format every eligible file under `dir`, returning the files changed.
    fn format(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// [`Formatter`] for `*.hcl` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct HclFormatter;

impl HclFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format one file in place. Returns whether its content changed.
    ///
    /// # Errors
    ///
    /// [`ScaffoldError::FormatFailed`] when the file cannot be read or is not
    /// valid HCL.
    pub fn format_file(&self, path: &Path) -> Result<bool> {
        let failure = |reason: String| ScaffoldError::FormatFailed {
            path: path.display().to_string(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| failure(e.to_string()))?;
        hcl::parse(&content).map_err(|e| failure(e.to_string()))?;

        let formatted = format_hcl(&content);
        if formatted == content {
            return Ok(false);
        }

        fs::write(path, formatted)
            .with_context(|| format!("Failed to write formatted file {}", path.display()))?;
        Ok(true)
    }
}

impl Formatter for HclFormatter {
    fn format(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut changed = Vec::new();

        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
            let is_hcl = entry.path().extension().and_then(|ext| ext.to_str()) == Some(HCL_FILE_EXTENSION);
            if !entry.file_type().is_file() || !is_hcl {
                continue;
            }

            if self.format_file(entry.path())? {
                tracing::debug!(target: "format", "Formatted {}", entry.path().display());
                changed.push(entry.into_path());
            }
        }

        Ok(changed)
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == TERRAGRUNT_CACHE_DIR
}
