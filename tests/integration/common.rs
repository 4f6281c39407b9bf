//! Shared fixtures for the integration suite.

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tgscaffold_cli::fetch::{Fetcher, SourceFetcher};
use tgscaffold_cli::format::HclFormatter;
use tgscaffold_cli::release::ReleaseLookup;
use tgscaffold_cli::scaffold::{ScaffoldOptions, Scaffolder};
use tgscaffold_cli::source::{SourceKind, SourceUrl};
use tgscaffold_cli::utils::fs::copy_dir;

/// Declarations of a small compute module.
pub const COMPUTE_VARIABLES: &str = r#"
variable "instance_count" {
  description = "Number of instances"
  type        = number
}

variable "region" {
  description = "AWS region"
  type        = string
  default     = "us-east-1"
}
"#;

/// Write `files` (relative path, content) under `root`.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Release lookup answering with a fixed tag, or failing when there is none.
#[derive(Default, Clone)]
pub struct FakeLookup {
    tag: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeLookup {
    pub fn with_tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReleaseLookup for FakeLookup {
    async fn latest_tag(&self, host: &str, owner: &str, repo: &str) -> Result<String> {
        self.calls.lock().unwrap().push(format!("{host}/{owner}/{repo}"));
        self.tag.clone().ok_or_else(|| anyhow::anyhow!("API rate limit exceeded"))
    }
}

/// Serves every remote locator from one fixture directory; local locators
/// are fetched for real.
#[derive(Clone)]
pub struct FixtureFetcher {
    module: PathBuf,
    pub fetched: Arc<Mutex<Vec<String>>>,
}

impl FixtureFetcher {
    pub fn new(module: &Path) -> Self {
        Self {
            module: module.to_path_buf(),
            fetched: Arc::default(),
        }
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, source: &SourceUrl, destination: &Path) -> Result<()> {
        self.fetched.lock().unwrap().push(source.to_string());
        if source.kind() == SourceKind::Local {
            return SourceFetcher::new().fetch(source, destination).await;
        }
        copy_dir(&self.module, destination)
    }
}

/// A working directory with a module fixture and an output directory.
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn module_dir(&self) -> PathBuf {
        self.root().join("module")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("out")
    }

    pub fn write_module(&self, files: &[(&str, &str)]) {
        write_tree(&self.module_dir(), files);
    }

    pub fn options(&self, module_url: &str) -> ScaffoldOptions {
        ScaffoldOptions::new(module_url, self.output_dir(), self.root())
    }

    pub fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.output_dir().join(relative)).unwrap()
    }
}

pub fn scaffolder(fetcher: &FixtureFetcher, lookup: &FakeLookup) -> Scaffolder {
    Scaffolder::new(
        Box::new(fetcher.clone()),
        Box::new(lookup.clone()),
        Box::new(HclFormatter::new()),
    )
}
