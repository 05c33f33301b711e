//! File helpers with path context on every error.

use std::{
    fs::{create_dir_all, read, write},
    path::Path,
};

use anyhow::{Context, Result};

pub fn read_font(path: &Path) -> Result<Vec<u8>> {
    read(path).with_context(|| format!("Failed to read font: {}", path.display()))
}

/// Write `data`, creating the parent directory first.
pub fn write_file(path: &Path, data: impl AsRef<[u8]>) -> Result<()> {
    ensure_parent_dir(path)?;
    write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}
