//! Override variables from `--var NAME=VALUE` entries and YAML var files.
//!
//! Var files are YAML mappings applied in order, so a later file wins over an
//! earlier one. `--var` entries are applied last and win over every file.

use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::PathBuf;

use crate::core::ScaffoldError;

/// Parse one `NAME=VALUE` entry.
///
/// The value is read as a YAML scalar so `true` and `5` keep their types;
/// anything that is not a scalar stays the literal text.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use tgscaffold_cli::scaffold::vars::parse_var;
///
/// assert_eq!(parse_var("Replicas=3").unwrap(), ("Replicas".to_string(), json!(3)));
/// assert_eq!(parse_var("SourceUrlType=git-ssh").unwrap().1, json!("git-ssh"));
/// assert!(parse_var("novalue").is_err());
/// ```
pub fn parse_var(entry: &str) -> Result<(String, JsonValue), ScaffoldError> {
    let Some((name, raw)) = entry.split_once('=') else {
        return Err(ScaffoldError::VarParse {
            input: entry.to_string(),
            reason: "expected NAME=VALUE".to_string(),
        });
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(ScaffoldError::VarParse {
            input: entry.to_string(),
            reason: "variable name is empty".to_string(),
        });
    }

    Ok((name.to_string(), scalar_value(raw)))
}

fn scalar_value(raw: &str) -> JsonValue {
    match serde_yaml::from_str::<JsonValue>(raw) {
        Ok(value @ (JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_))) => value,
        _ => JsonValue::String(raw.to_string()),
    }
}

/// Parse every `--var` entry, later entries replacing earlier ones.
pub fn parse_vars(entries: &[String]) -> Result<Map<String, JsonValue>> {
    let mut vars = Map::new();
    for entry in entries {
        let (name, value) = parse_var(entry)?;
        vars.insert(name, value);
    }
    Ok(vars)
}

/// Variables from `var_files` in order, then `overrides` on top.
///
/// # Errors
///
/// A file that cannot be read is an IO error; a file whose content is not a
/// YAML mapping is [`ScaffoldError::VarParse`].
pub fn load_vars(
    overrides: &Map<String, JsonValue>,
    var_files: &[PathBuf],
) -> Result<Map<String, JsonValue>> {
    let mut vars = Map::new();

    for path in var_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read var file {}", path.display()))?;
        if content.trim().is_empty() {
            continue;
        }
        let parsed: JsonValue =
            serde_yaml::from_str(&content).map_err(|e| ScaffoldError::VarParse {
                input: path.display().to_string(),
                reason: e.to_string(),
            })?;

        match parsed {
            JsonValue::Object(map) => {
                tracing::debug!("Loaded {} variable(s) from {}", map.len(), path.display());
                vars.extend(map);
            }
            JsonValue::Null => {}
            _ => {
                return Err(ScaffoldError::VarParse {
                    input: path.display().to_string(),
                    reason: "var file must contain a mapping of names to values".to_string(),
                }
                .into());
            }
        }
    }

    vars.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(vars)
}
