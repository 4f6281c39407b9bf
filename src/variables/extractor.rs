//! Directory walk and per-file extraction of variable declarations.
//!
//! Only two conditions abort an extraction: the directory walk itself failing,
//! and a resolved default value that cannot be serialized. Everything else is
//! a per-item problem that is logged and skipped:
//!
//! | Condition                        | Effect                                |
//! |----------------------------------|---------------------------------------|
//! | file cannot be read              | file skipped, `error` log             |
//! | file is not valid HCL            | file skipped, `warn` log              |
//! | `description` unresolvable       | `No description for <name>`           |
//! | `type` unresolvable              | `No type for <name>`                  |
//! | `default` unresolvable           | treated as no default (required)      |

use anyhow::{Context, Result};
use hcl::{Block, Body, Value};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::InputDescriptor;
use super::attribute::{AttributeValue, resolve_attribute};
use crate::constants::{DECLARATION_FILE_EXTENSION, VARIABLE_BLOCK};
use crate::core::ScaffoldError;

/// Recursively list declaration files under `root`, in file-name order.
///
/// Symlinks to files are listed; symlinked directories are not descended into.
///
/// # Errors
///
/// Any walk error (unreadable root or subdirectory) is returned as
/// [`ScaffoldError::DirectoryListing`].
pub fn list_declaration_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| ScaffoldError::DirectoryListing {
            path: root.display().to_string(),
            reason: e.to_string(),
        })?;

        let is_declaration = entry.path().extension().and_then(|ext| ext.to_str())
            == Some(DECLARATION_FILE_EXTENSION);
        let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && is_declaration {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(
        target: "extract",
        "Found {} declaration file(s) under {}",
        files.len(),
        root.display()
    );
    Ok(files)
}

/// Extract one [`InputDescriptor`] per variable block found under `root`.
///
/// Descriptors are returned in block order within a file and files in walk
/// order.
///
/// # Errors
///
/// Returns an error when the directory cannot be listed or a default value
/// cannot be serialized. Unreadable and unparsable files are skipped.
pub fn extract_inputs(root: &Path) -> Result<Vec<InputDescriptor>> {
    let files = list_declaration_files(root)?;
    let mut inputs = Vec::new();

    for file in &files {
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(target: "extract", "Error reading file {}: {}", file.display(), e);
                continue;
            }
        };

        let body = match parse_declarations(&content) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(target: "extract", "Failed to parse HCL in file {}: {}", file.display(), e);
                continue;
            }
        };

        extract_from_body(&body, &mut inputs)
            .with_context(|| format!("Failed to extract variables from {}", file.display()))?;
    }

    tracing::debug!(target: "extract", "Extracted {} input variable(s)", inputs.len());
    Ok(inputs)
}

/// Parse declaration text into a block tree.
fn parse_declarations(content: &str) -> hcl::Result<Body> {
    hcl::parse(content)
}

fn extract_from_body(body: &Body, inputs: &mut Vec<InputDescriptor>) -> Result<()> {
    for block in body.blocks() {
        if block.identifier() != VARIABLE_BLOCK {
            continue;
        }
        let Some(name) = block.labels().first().map(|label| label.as_str()) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        inputs.push(describe_variable(name, block)?);
    }
    Ok(())
}

fn describe_variable(name: &str, block: &Block) -> Result<InputDescriptor> {
    let mut descriptor = InputDescriptor::placeholder(name);

    if let Some(value) = resolved_value(block, name, "description") {
        descriptor.description = display_text(&value);
    }

    if let Some(value) = resolved_value(block, name, "type") {
        descriptor.type_name = display_text(&value);
    }

    if let Some(mut value) = resolved_value(block, name, "default") {
        sort_object_keys(&mut value);
        descriptor.default_value =
            serde_json::to_string(&value).map_err(|e| ScaffoldError::DefaultSerialization {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
    }

    Ok(descriptor)
}

/// Resolve an attribute, logging and dropping unresolvable expressions.
fn resolved_value(block: &Block, variable: &str, attribute: &str) -> Option<Value> {
    match resolve_attribute(block, attribute)? {
        AttributeValue::Unresolvable(reason) => {
            tracing::warn!(
                target: "extract",
                "Failed to read {} attribute for {}: {}",
                attribute,
                variable,
                reason
            );
            None
        }
        resolved => resolved.into_value(),
    }
}

/// Object keys in sorted order, at every depth.
fn sort_object_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.sort_keys();
            map.values_mut().for_each(sort_object_keys);
        }
        Value::Array(items) => items.iter_mut().for_each(sort_object_keys),
        _ => {}
    }
}

/// Strings are shown as-is, anything else as its JSON text.
fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{other:?}")),
    }
}
