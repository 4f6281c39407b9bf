//! tgscaffold - Terragrunt scaffolding for Terraform modules
//!
//! Given the location of a reusable Terraform module, tgscaffold downloads it,
//! reads the input variables it declares and renders a ready-to-edit
//! `terragrunt.hcl` that points at the module and lists every input.
//!
//! # Architecture Overview
//!
//! A run is a strict pipeline; each stage completes before the next begins and
//! the first fatal error ends the run:
//!
//! ```text
//! locator ─▶ source::SourceResolver ─▶ fetch::Fetcher ─▶ variables::extract_inputs
//!        ─▶ variables::classify ─▶ scaffold::ScaffoldContext
//!        ─▶ templating::TemplateRenderer ─▶ format::HclFormatter
//! ```
//!
//! Extraction tolerates broken modules: unreadable or unparsable files and
//! attributes that cannot be resolved are logged and skipped, so a scaffold is
//! produced for whatever the module does declare.
//!
//! # Modules
//!
//! ## Pipeline
//! - [`source`] - Locator normalization, latest-release pinning, SSH rewrite
//! - [`fetch`] - Materializing git and local locators into a directory
//! - [`variables`] - Variable declaration extraction and classification
//! - [`scaffold`] - Context assembly, override variables and the run itself
//! - [`templating`] - Template folder rendering with `tera`
//! - [`format`] - Canonical layout of generated HCL
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`core`] - Error types and user-facing error reporting
//! - [`git`] - System `git` invocations
//! - [`release`] - Latest-release lookup against the GitHub API
//! - [`constants`] - Shared names, defaults and timeouts
//! - [`utils`] - File system helpers
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Scaffold the latest release of a module
//! tgscaffold scaffold github.com/org/modules//vpc
//!
//! # Use SSH URLs in the generated source and write elsewhere
//! tgscaffold scaffold github.com/org/modules//vpc --var SourceUrlType=git-ssh -o live/vpc
//!
//! # Show what a module expects
//! tgscaffold inputs ./modules/vpc
//! ```
//!
//! # Generated Output
//!
//! ```hcl
//! terraform {
//!   source = "git::https://github.com/org/modules.git//vpc?ref=v1.4.0"
//! }
//!
//! inputs = {
//!   # Description: CIDR block of the VPC
//!   # Type: string
//!   cidr_block = null  # TODO: fill in value
//!
//!   # Description: Tags applied to every resource
//!   # Type: map(string)
//!   # tags = {}
//! }
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod fetch;
pub mod format;
pub mod git;
pub mod release;
pub mod scaffold;
pub mod source;
pub mod templating;
pub mod utils;
pub mod variables;

#[cfg(test)]
pub mod test_utils;
