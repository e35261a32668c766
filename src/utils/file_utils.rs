//! File system utilities

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Ensure directory exists
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| anyhow!("Failed to create directory {}: {}", path.display(), e))?;
    }
    Ok(())
}

/// Write `text` to `path` atomically.
///
/// The text is written to a `.tmp` sibling first and then renamed onto the
/// final path, so a concurrent reader never observes a partially written
/// file.
pub fn atomic_write(path: &Path, text: &str) -> std::io::Result<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os_string = path.as_os_str().to_owned();
    os_string.push(".tmp");
    PathBuf::from(os_string)
}
