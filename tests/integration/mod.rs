//! Integration test suite for tgscaffold
//!
//! End-to-end tests of the scaffold pipeline and the `tgscaffold` binary.
//! Network access is never needed: release lookups go through an in-process
//! fake and modules are served from local fixture directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **common**: Fixture modules, fake release lookup and fetcher
//! - **scaffold_pipeline**: Full runs with the default, module and explicit templates
//! - **source_resolution**: Ref pinning and SSH rewriting as seen in generated files
//! - **cli**: The binary's `scaffold` and `inputs` commands

mod cli;
mod common;
mod scaffold_pipeline;
mod source_resolution;
