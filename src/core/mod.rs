//! Core types shared by every stage of a scaffold run.
//!
//! Currently this is the error taxonomy: [`ScaffoldError`] for fatal
//! conditions and [`user_friendly_error`] to turn an `anyhow` chain into the
//! single terminal message the CLI prints.

pub mod error;

pub use error::{ErrorContext, ScaffoldError, user_friendly_error};
