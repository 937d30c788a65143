//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::Path;

/// Create the directory a file will live in, if it has one
pub fn ensure_parent_dir(file: &Path) -> Result<()> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => storage::ensure_dir(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display())),
        _ => Ok(()),
    }
}
