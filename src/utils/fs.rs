//! File system helpers shared by the fetcher, renderer and formatter.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Directory names never copied out of a fetched source.
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Creates `path` and its parents if needed.
///
/// # Errors
///
/// Fails when the directory cannot be created or `path` exists as a file.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Writes `content` to `path`, creating parent directories first.
pub fn write_file(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Recursively copies `src` into `dst`.
///
/// `.git` directories are skipped. A symlink to a file is copied as the file
/// it points to; other symlinks are skipped. Existing files in `dst` are
/// overwritten.
///
/// # Examples
///
/// ```rust,no_run
/// use tgscaffold_cli::utils::fs::copy_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// copy_dir(Path::new("checkout/modules/vpc"), Path::new("module"))?;
/// # Ok(())
/// # }
/// ```
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            if SKIPPED_DIRS.iter().any(|skip| entry.file_name() == *skip) {
                continue;
            }
            copy_dir(&src_path, &dst_path)?;
        } else if file_type.is_file() || (file_type.is_symlink() && src_path.is_file()) {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }

    Ok(())
}
