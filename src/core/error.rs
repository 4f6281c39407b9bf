//! Error handling for tgscaffold
//!
//! This module provides the error types and user-friendly error reporting for the
//! scaffold pipeline. The error system is designed around two principles:
//! 1. **Strongly-typed errors** for every fatal stage of a run
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`ScaffoldError`] - Enumerated error types for all fatal failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! Recoverable conditions (an unreadable declaration file, an attribute that cannot
//! be resolved, a failed latest-release lookup) are *not* represented here. They are
//! logged as warnings where they happen and the run continues with a placeholder.
//!
//! # Error Conversion and Context
//!
//! Application code propagates with [`anyhow::Result`] and adds the stage and input through
//! `.with_context(..)`; [`user_friendly_error`] downcasts the chain back to a
//! [`ScaffoldError`] when it can and attaches a suggestion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tgscaffold_cli::core::{ScaffoldError, user_friendly_error};
//!
//! let error = anyhow::Error::from(ScaffoldError::GitNotFound);
//! let ctx = user_friendly_error(error);
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for scaffold operations.
///
/// Each variant corresponds to one fatal stage of a run: locator
/// normalization, fetching, declaration listing, default serialization,
/// rendering and formatting. Variants carry the offending input so the
/// terminal message identifies both the stage and what it was working on.
#[derive(Error, Debug, Clone)]
pub enum ScaffoldError {
    /// A module or template locator could not be normalized.
    #[error("Invalid source locator '{locator}': {reason}")]
    SourceParse {
        /// The raw locator as supplied by the user
        locator: String,
        /// Why normalization failed
        reason: String,
    },

    /// Materializing a locator onto local storage failed.
    #[error("Failed to fetch '{locator}': {reason}")]
    FetchFailed {
        /// The normalized locator being fetched
        locator: String,
        /// Why the fetch failed
        reason: String,
    },

    /// The module directory could not be listed for declaration files.
    #[error("Failed to list declaration files under {path}: {reason}")]
    DirectoryListing {
        /// Root of the walk
        path: String,
        /// Underlying walk error
        reason: String,
    },

    /// A resolved default value could not be turned into canonical text.
    #[error("Failed to serialize default value of variable '{name}': {reason}")]
    DefaultSerialization {
        /// Variable whose default failed to serialize
        name: String,
        /// Underlying serializer error
        reason: String,
    },

    /// The latest release of a repository could not be determined.
    #[error("Failed to look up latest release of {owner}/{repo} on {host}: {reason}")]
    ReleaseLookupFailed {
        /// Repository host
        host: String,
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Why the lookup failed
        reason: String,
    },

    /// A template folder has no `boilerplate.yml` and the policy is to exit.
    #[error("Template configuration {path} not found")]
    TemplateConfigMissing {
        /// Expected configuration path
        path: String,
    },

    /// A template variable has neither a supplied value nor a default.
    #[error("Template variable '{name}' has no value and no default")]
    MissingTemplateVariable {
        /// Declared variable name
        name: String,
        /// Close matches among the supplied variables
        suggestions: Vec<String>,
    },

    /// A template file failed to render.
    #[error("Failed to render template {file}: {reason}")]
    TemplateRender {
        /// Template-relative file path
        file: String,
        /// Full tera error chain
        reason: String,
    },

    /// A rendered file is not valid HCL or could not be rewritten.
    #[error("Failed to format {path}: {reason}")]
    FormatFailed {
        /// File being formatted
        path: String,
        /// Parser or IO error
        reason: String,
    },

    /// An override variable or variable file is malformed.
    #[error("Invalid variable {input}: {reason}")]
    VarParse {
        /// The `--var` entry or var-file path
        input: String,
        /// What is wrong with it
        reason: String,
    },

    /// Git operation failed during execution.
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git subcommand that failed
        operation: String,
        /// Standard error output of git
        stderr: String,
    },

    /// Git executable not available.
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// Catch-all carrying a preformatted message.
    #[error("{message}")]
    Other {
        /// Message shown to the user
        message: String,
    },
}

/// Error wrapper with a user-facing suggestion and details.
///
/// Produced by [`user_friendly_error`] and printed once by the binary when a
/// run aborts.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ScaffoldError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Extra background on the failure
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error without suggestion or details.
    #[must_use]
    pub const fn new(error: ScaffoldError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach an actionable suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach background details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// The whole `anyhow` chain is searched for a [`ScaffoldError`]; when one is
/// found, the outer context messages (which name the stage that failed) are kept
/// as details and a suggestion matching the variant is attached. Anything else
/// becomes [`ScaffoldError::Other`] with the full cause chain in its message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let scaffold_error = error.chain().find_map(|cause| cause.downcast_ref::<ScaffoldError>());

    if let Some(scaffold_error) = scaffold_error {
        let mut ctx = create_error_context(scaffold_error.clone());
        let outer = error.to_string();
        if outer != scaffold_error.to_string() && ctx.details.is_none() {
            ctx = ctx.with_details(outer);
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(ScaffoldError::Other {
                message: error.to_string(),
            })
            .with_suggestion("Check file ownership and permissions of the output directory");
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ScaffoldError::Other {
        message,
    })
}

fn create_error_context(error: ScaffoldError) -> ErrorContext {
    let (suggestion, details): (Option<String>, Option<String>) = match &error {
        ScaffoldError::SourceParse { .. } => (
            Some("Use a git URL (git::https://host/org/repo//path?ref=v1.0.0), a github.com/org/repo shorthand, or a local directory path".to_string()),
            None,
        ),

        ScaffoldError::FetchFailed { locator, .. } => (
            Some(format!(
                "Check that '{locator}' exists and that you have access to it. For private repositories configure git credentials or SSH keys"
            )),
            Some("The module and template are downloaded before any variables are read".to_string()),
        ),

        ScaffoldError::DirectoryListing { .. } => {
            (Some("Check that the fetched module directory is readable".to_string()), None)
        }

        ScaffoldError::DefaultSerialization { .. } => (
            None,
            Some("Default values are converted to JSON text so they can be shown in the scaffold".to_string()),
        ),

        ScaffoldError::TemplateConfigMissing { .. } => (
            Some("Add a boilerplate.yml to the template folder (an empty `variables: []` list is enough)".to_string()),
            None,
        ),

        ScaffoldError::MissingTemplateVariable { name, suggestions } => {
            let suggestion = if suggestions.is_empty() {
                format!("Pass a value with --var {name}=VALUE or declare a default in boilerplate.yml")
            } else {
                format!("Pass a value with --var {name}=VALUE. Did you mean: {}?", suggestions.join(", "))
            };
            (Some(suggestion), None)
        }

        ScaffoldError::TemplateRender { .. } => (
            Some(
                "Check template syntax: variables use {{ var }}, control flow uses {% %}. \
                 Inputs are available as parsedRequiredInputs and parsedOptionalInputs"
                    .to_string(),
            ),
            None,
        ),

        ScaffoldError::FormatFailed { .. } => (
            Some("The rendered file is not valid HCL. Fix the template, or rerun with --no-format to inspect the output".to_string()),
            None,
        ),

        ScaffoldError::VarParse { .. } => (
            Some("Variables are passed as --var NAME=VALUE; var files must be YAML mappings".to_string()),
            None,
        ),

        ScaffoldError::GitNotFound => (
            Some("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')".to_string()),
            Some("git is required to fetch modules and templates from repositories".to_string()),
        ),

        ScaffoldError::GitCommandError { stderr, .. } => (
            Some("Check the repository URL, the ref and your network connection. Try the git command manually for more details".to_string()),
            Some(stderr.trim().to_string()),
        ),

        _ => (None, None),
    };

    ErrorContext {
        error,
        suggestion,
        details,
    }
}
