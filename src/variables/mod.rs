//! Input variable extraction and classification.
//!
//! This module recovers the declared input variables of a Terraform module
//! for display in a scaffold. Nothing is validated, type-checked or executed;
//! the goal is a human-readable summary of each `variable "name" { ... }`
//! block that survives malformed or partially-specified declarations.
//!
//! # Pipeline
//!
//! ```text
//! module dir ──walk──▶ *.tf files ──parse──▶ variable blocks
//!     ──resolve attributes──▶ InputDescriptor ──classify──▶ InputSet
//! ```
//!
//! - [`attribute`] resolves `description`, `type` and `default` expressions
//!   without an evaluation context.
//! - [`extractor`] walks the directory and builds one [`InputDescriptor`] per
//!   variable block.
//! - [`classify`] splits descriptors into required (no default) and optional
//!   (has default) inputs, keeping discovery order.
//!
//! # Template Contract
//!
//! Descriptors serialize with the field names templates use:
//!
//! ```text
//! {% for input in parsedRequiredInputs %}
//! {{ input.Name }} / {{ input.Description }} / {{ input.Type }} / {{ input.DefaultValue }}
//! {% endfor %}
//! ```

pub mod attribute;
pub mod extractor;

pub use attribute::{AttributeValue, resolve_attribute};
pub use extractor::{extract_inputs, list_declaration_files};

use serde::{Deserialize, Serialize};

/// One declared input variable, as shown in a scaffold.
///
/// Built once per variable block during extraction and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InputDescriptor {
    /// Variable name, the block's first label
    pub name: String,
    /// Description, or `No description for <name>`
    pub description: String,
    /// Type constraint, or `No type for <name>`
    #[serde(rename = "Type")]
    pub type_name: String,
    /// JSON text of the default value; empty when there is none
    pub default_value: String,
}

impl InputDescriptor {
    /// Descriptor for a variable with no resolvable attributes.
    #[must_use]
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("No description for {name}"),
            type_name: format!("No type for {name}"),
            default_value: String::new(),
        }
    }

    /// A variable without a default must be given a value by the caller.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.default_value.is_empty()
    }
}

/// Inputs split by whether the module supplies a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputSet {
    /// Inputs without a default, in discovery order
    pub required: Vec<InputDescriptor>,
    /// Inputs with a default, in discovery order
    pub optional: Vec<InputDescriptor>,
}

impl InputSet {
    /// Total number of inputs in both partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.required.len() + self.optional.len()
    }

    /// `true` when the module declares no inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }
}

/// Partition descriptors into required and optional inputs.
///
/// Stable: relative order within each partition matches the input order.
#[must_use]
pub fn classify(descriptors: Vec<InputDescriptor>) -> InputSet {
    let (required, optional): (Vec<_>, Vec<_>) =
        descriptors.into_iter().partition(InputDescriptor::is_required);
    InputSet {
        required,
        optional,
    }
}
