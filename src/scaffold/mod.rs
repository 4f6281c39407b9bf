//! The scaffold pipeline.
//!
//! A run turns a module locator into a ready-to-edit `terragrunt.hcl`:
//!
//! ```text
//! load override vars
//!   → resolve module locator (pin latest release, apply URL form)
//!   → fetch module into a scratch dir
//!   → pick template (explicit locator, module .boilerplate/, or default)
//!   → extract + classify inputs
//!   → assemble context
//!   → render into the output dir
//!   → format generated HCL
//! ```
//!
//! Stages run strictly one after another and the first fatal error ends the
//! run. Scratch directories are removed when the run finishes.

pub mod context;
pub mod vars;

pub use context::ScaffoldContext;
pub use vars::{load_vars, parse_var, parse_vars};

use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::DEFAULT_BOILERPLATE_DIR;
use crate::fetch::Fetcher;
use crate::format::Formatter;
use crate::release::ReleaseLookup;
use crate::source::SourceResolver;
use crate::templating::{MissingConfigAction, MissingKeyAction, TemplateRenderer, write_default_template};
use crate::utils::fs::ensure_dir;
use crate::variables::{InputSet, classify, extract_inputs};

/// Everything a scaffold run needs from its caller.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Module locator
    pub module_url: String,
    /// Template locator; `None` uses the module's `.boilerplate/` or the default
    pub template_url: Option<String>,
    /// Directory the scaffold is written into
    pub output_dir: PathBuf,
    /// Base for relative local locators
    pub working_dir: PathBuf,
    /// Override variables, applied after var files
    pub vars: Map<String, JsonValue>,
    /// YAML var files, applied in order
    pub var_files: Vec<PathBuf>,
    /// Run the formatter over the output directory
    pub format: bool,
    pub missing_key: MissingKeyAction,
    pub missing_config: MissingConfigAction,
}

impl ScaffoldOptions {
    /// Options with defaults for everything but the module and directories.
    pub fn new(module_url: impl Into<String>, output_dir: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            module_url: module_url.into(),
            template_url: None,
            output_dir: output_dir.into(),
            working_dir: working_dir.into(),
            vars: Map::new(),
            var_files: Vec::new(),
            format: true,
            missing_key: MissingKeyAction::default(),
            missing_config: MissingConfigAction::default(),
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    /// Final module locator written into the scaffold
    pub source_url: String,
    /// Inputs discovered in the module
    pub inputs: InputSet,
    /// Files written into the output directory
    pub files: Vec<PathBuf>,
}

/// Runs the scaffold pipeline over pluggable collaborators.
pub struct Scaffolder {
    fetcher: Box<dyn Fetcher>,
    lookup: Box<dyn ReleaseLookup>,
    formatter: Box<dyn Formatter>,
}

impl Scaffolder {
    pub fn new(fetcher: Box<dyn Fetcher>, lookup: Box<dyn ReleaseLookup>, formatter: Box<dyn Formatter>) -> Self {
        Self {
            fetcher,
            lookup,
            formatter,
        }
    }

    /// Generate a scaffold for `options.module_url` into `options.output_dir`.
    pub async fn run(&self, options: &ScaffoldOptions) -> Result<ScaffoldOutcome> {
        let vars = load_vars(&options.vars, &options.var_files).context("Failed to load variables")?;

        let resolver = SourceResolver::new(self.lookup.as_ref(), &options.working_dir);
        let resolved = resolver
            .resolve(&options.module_url, &vars)
            .await
            .with_context(|| format!("Failed to resolve module source {}", options.module_url))?;

        let module_dir = TempDir::new().context("Failed to create module scratch directory")?;
        tracing::info!("Downloading module {}", resolved.pinned);
        self.fetcher.fetch(&resolved.pinned, module_dir.path()).await?;

        let template_scratch = TempDir::new().context("Failed to create template scratch directory")?;
        let template_dir = self
            .prepare_template(&resolver, options, module_dir.path(), template_scratch.path())
            .await?;

        let inputs = classify(extract_inputs(module_dir.path()).context("Failed to extract module inputs")?);
        tracing::info!(
            "Found {} required and {} optional input(s)",
            inputs.required.len(),
            inputs.optional.len()
        );

        let context = ScaffoldContext::assemble(&vars, &inputs, &resolved.source_url);
        log_locator_validation(&resolved.source_url);

        ensure_dir(&options.output_dir)?;
        let renderer = TemplateRenderer::new(options.missing_key, options.missing_config);
        let files = renderer
            .render(&template_dir, &options.output_dir, context.as_map())
            .with_context(|| format!("Failed to render template into {}", options.output_dir.display()))?;

        if options.format {
            self.formatter
                .format(&options.output_dir)
                .context("Failed to format generated files")?;
        }

        tracing::info!("Scaffold written to {}", options.output_dir.display());
        Ok(ScaffoldOutcome {
            source_url: resolved.source_url,
            inputs,
            files,
        })
    }

    /// Explicit template, then the module's `.boilerplate/`, then the default.
    async fn prepare_template(
        &self,
        resolver: &SourceResolver<'_>,
        options: &ScaffoldOptions,
        module_dir: &Path,
        scratch: &Path,
    ) -> Result<PathBuf> {
        if let Some(template_url) = &options.template_url {
            let source = resolver
                .normalize(template_url)
                .with_context(|| format!("Failed to resolve template source {template_url}"))?;
            tracing::info!("Using template {}", source);
            self.fetcher.fetch(&source, scratch).await?;
            return Ok(scratch.to_path_buf());
        }

        let module_template = module_dir.join(DEFAULT_BOILERPLATE_DIR);
        if module_template.is_dir() {
            tracing::info!("Using template from module {}", DEFAULT_BOILERPLATE_DIR);
            return Ok(module_template);
        }

        tracing::debug!("Using default template");
        write_default_template(scratch)?;
        Ok(scratch.to_path_buf())
    }
}

/// Informational only; the outcome never changes the run.
fn log_locator_validation(source_url: &str) {
    match url::Url::parse(source_url) {
        Ok(parsed) => tracing::debug!(
            target: "source",
            "Source URL {} parsed with scheme {}",
            source_url,
            parsed.scheme()
        ),
        Err(e) => tracing::debug!(target: "source", "Source URL {} is not a plain URL: {}", source_url, e),
    }
}
