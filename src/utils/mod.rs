//! Small helpers shared across stages.
//!
//! - [`fs`] - directory creation, file writes and recursive copies

pub mod fs;

pub use fs::{copy_dir, ensure_dir, write_file};
