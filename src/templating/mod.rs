//! Template folder rendering for scaffolds.
//!
//! A template folder is a directory of files rendered with [`tera`] plus an
//! optional `boilerplate.yml` declaring template variables and their defaults.
//! Every file except the configuration is rendered and written to the same
//! relative path in the output folder.
//!
//! # Template Context
//!
//! The scaffold pipeline renders with a flat context:
//!
//! - `sourceUrl`: the final module locator
//! - `parsedRequiredInputs` / `parsedOptionalInputs`: lists of inputs with
//!   `Name`, `Description`, `Type` and `DefaultValue`
//! - every user-supplied variable, plus defaults of declared variables
//!
//! ```text
//! terraform {
//!   source = "{{ sourceUrl }}"
//! }
//! {% for input in parsedRequiredInputs %}
//! {{ input.Name }} = null
//! {% endfor %}
//! ```
//!
//! # Policies
//!
//! | Policy                               | Effect                                          |
//! |--------------------------------------|-------------------------------------------------|
//! | [`MissingKeyAction::Invalid`]        | undefined variable renders as `<no value>`      |
//! | [`MissingKeyAction::ZeroValue`]      | undefined variable renders as empty text        |
//! | [`MissingKeyAction::ExitWithError`]  | undefined variable fails the render             |
//! | [`MissingConfigAction::Exit`]        | no `boilerplate.yml` fails the render           |
//! | [`MissingConfigAction::Ignore`]      | no `boilerplate.yml` means no declared variables|
//!
//! Substitution only applies to undefined top-level variables; a missing
//! attribute of a defined object is always an error.

pub mod config;
pub mod defaults;
pub mod renderer;

pub use config::{BoilerplateConfig, TemplateVariable};
pub use defaults::{DEFAULT_BOILERPLATE_CONFIG, DEFAULT_TERRAGRUNT_TEMPLATE, write_default_template};
pub use renderer::TemplateRenderer;

/// What to do when a template references an undefined variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MissingKeyAction {
    /// Render `<no value>`
    #[default]
    Invalid,
    /// Render an empty string
    ZeroValue,
    /// Fail the render
    ExitWithError,
}

impl MissingKeyAction {
    /// Text substituted for an undefined variable, if any.
    #[must_use]
    pub const fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::Invalid => Some("<no value>"),
            Self::ZeroValue => Some(""),
            Self::ExitWithError => None,
        }
    }
}

/// What to do when a template folder has no `boilerplate.yml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MissingConfigAction {
    /// Fail the render
    #[default]
    Exit,
    /// Continue without declared variables
    Ignore,
}
