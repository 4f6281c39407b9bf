//! `boilerplate.yml`: the variables a template folder declares.
//!
//! ```yaml
//! variables:
//!   - name: SourceUrlType
//!     description: Source URL type, git-https or git-ssh
//!     default: git-https
//! ```
//!
//! Keys other than `variables` (dependencies, hooks, partials) are accepted and
//! ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Parsed template configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BoilerplateConfig {
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
}

/// One declared template variable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `None` when absent or null; such a variable must be supplied.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

impl BoilerplateConfig {
    /// Parse configuration text. An empty document declares nothing.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Invalid boilerplate configuration")
    }

    /// Read and parse the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
