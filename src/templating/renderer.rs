//! Rendering a template folder into an output folder.

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};
use walkdir::WalkDir;

use super::config::BoilerplateConfig;
use super::{MissingConfigAction, MissingKeyAction};
use crate::constants::BOILERPLATE_CONFIG_FILE;
use crate::core::ScaffoldError;
use crate::utils::fs::write_file;

/// Maximum distance, as a percentage of the name length, for a suggestion.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Renders every file of a template folder with `tera`.
///
/// # Examples
///
/// ```rust,no_run
/// use tgscaffold_cli::templating::{MissingConfigAction, MissingKeyAction, TemplateRenderer};
/// use serde_json::{Map, json};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let mut vars = Map::new();
/// vars.insert("sourceUrl".to_string(), json!("git::https://github.com/org/repo.git"));
///
/// let renderer = TemplateRenderer::new(MissingKeyAction::Invalid, MissingConfigAction::Exit);
/// let written = renderer.render(Path::new("template"), Path::new("."), &vars)?;
/// println!("wrote {} file(s)", written.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer {
    missing_key: MissingKeyAction,
    missing_config: MissingConfigAction,
}

impl TemplateRenderer {
    pub const fn new(missing_key: MissingKeyAction, missing_config: MissingConfigAction) -> Self {
        Self {
            missing_key,
            missing_config,
        }
    }

    /// Render `template_folder` into `output_folder` with `vars`.
    ///
    /// Declared template variables missing from `vars` take their default.
    /// Returns the written paths, in template walk order.
    ///
    /// # Errors
    ///
    /// - [`ScaffoldError::TemplateConfigMissing`] when there is no
    ///   `boilerplate.yml` and the config policy is to exit
    /// - [`ScaffoldError::MissingTemplateVariable`] for a declared variable
    ///   with no value and no default
    /// - [`ScaffoldError::TemplateRender`] when a file fails to render
    pub fn render(
        &self,
        template_folder: &Path,
        output_folder: &Path,
        vars: &Map<String, JsonValue>,
    ) -> Result<Vec<PathBuf>> {
        let mut context = self.resolve_variables(template_folder, vars)?;
        let mut written = Vec::new();

        let walker = WalkDir::new(template_folder)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != ".git");

        for entry in walker {
            let entry = entry.with_context(|| {
                format!("Failed to walk template folder {}", template_folder.display())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(template_folder).with_context(|| {
                format!("{} is outside {}", entry.path().display(), template_folder.display())
            })?;
            if relative == Path::new(BOILERPLATE_CONFIG_FILE) {
                continue;
            }

            let destination = output_folder.join(relative);
            let bytes = fs::read(entry.path())
                .with_context(|| format!("Failed to read template {}", entry.path().display()))?;

            match String::from_utf8(bytes) {
                Ok(text) => {
                    let rendered = self.render_content(&relative.display().to_string(), &text, &mut context)?;
                    write_file(&destination, rendered)?;
                }
                Err(raw) => {
                    tracing::debug!(target: "render", "Copying binary file {}", relative.display());
                    write_file(&destination, raw.into_bytes())?;
                }
            }

            tracing::debug!(target: "render", "Wrote {}", destination.display());
            written.push(destination);
        }

        Ok(written)
    }

    /// Supplied variables plus defaults for declared variables not supplied.
    fn resolve_variables(
        &self,
        template_folder: &Path,
        vars: &Map<String, JsonValue>,
    ) -> Result<Map<String, JsonValue>> {
        let config_path = template_folder.join(BOILERPLATE_CONFIG_FILE);
        let config = if config_path.is_file() {
            BoilerplateConfig::load(&config_path)?
        } else {
            match self.missing_config {
                MissingConfigAction::Exit => {
                    return Err(ScaffoldError::TemplateConfigMissing {
                        path: config_path.display().to_string(),
                    }
                    .into());
                }
                MissingConfigAction::Ignore => {
                    tracing::debug!(
                        target: "render",
                        "No {} in {}, continuing without declared variables",
                        BOILERPLATE_CONFIG_FILE,
                        template_folder.display()
                    );
                    BoilerplateConfig::default()
                }
            }
        };

        let mut context = vars.clone();
        for variable in config.variables {
            if context.contains_key(&variable.name) {
                continue;
            }
            match variable.default {
                Some(default) => {
                    context.insert(variable.name, default);
                }
                None => {
                    let suggestions = find_similar_names(&variable.name, context.keys());
                    return Err(ScaffoldError::MissingTemplateVariable {
                        name: variable.name,
                        suggestions,
                    }
                    .into());
                }
            }
        }

        Ok(context)
    }

    /// Render one template, substituting undefined variables per policy.
    fn render_content(
        &self,
        file: &str,
        content: &str,
        context: &mut Map<String, JsonValue>,
    ) -> Result<String> {
        loop {
            let tera_context = TeraContext::from_serialize(&*context).map_err(|e| {
                ScaffoldError::TemplateRender {
                    file: file.to_string(),
                    reason: error_chain(&e),
                }
            })?;

            let mut tera = Tera::default();
            tera.autoescape_on(vec![]);

            let error = match tera.render_str(content, &tera_context) {
                Ok(rendered) => return Ok(rendered),
                Err(e) => e,
            };
            let reason = error_chain(&error);

            let substitute = self.missing_key.placeholder().and_then(|placeholder| {
                extract_variable_name(&reason)
                    .filter(|name| is_top_level(name) && !context.contains_key(name))
                    .map(|name| (name, placeholder))
            });

            match substitute {
                Some((name, placeholder)) => {
                    tracing::warn!(
                        target: "render",
                        "Variable {} is not defined in {}, using {:?}",
                        name,
                        file,
                        placeholder
                    );
                    context.insert(name, JsonValue::String(placeholder.to_string()));
                }
                None => {
                    return Err(ScaffoldError::TemplateRender {
                        file: file.to_string(),
                        reason,
                    }
                    .into());
                }
            }
        }
    }
}

/// The error and all its sources, joined with `: `.
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Extract variable name from "Variable `foo` not found" message
fn extract_variable_name(error_msg: &str) -> Option<String> {
    let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
    re.captures(error_msg)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_top_level(name: &str) -> bool {
    !name.contains('.') && !name.contains('[')
}

/// Up to three supplied names close to `target`, closest first.
fn find_similar_names<'a>(target: &str, available: impl Iterator<Item = &'a String>) -> Vec<String> {
    let max_distance = target.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
    let mut scored: Vec<_> = available
        .map(|name| (name.clone(), levenshtein(&target.to_lowercase(), &name.to_lowercase())))
        .filter(|(_, distance)| *distance <= max_distance)
        .collect();

    scored.sort_by_key(|(_, distance)| *distance);
    scored.into_iter().take(3).map(|(name, _)| name).collect()
}
