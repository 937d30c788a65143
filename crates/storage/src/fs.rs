//! Plain file operations
//!
//! Thin wrappers over `std::fs` that attach the offending path to every
//! error. Nothing here is atomic beyond what the host file system offers.

use crate::{Result, StorageError};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Check whether a path exists
pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Delete a single file
///
/// A missing file is reported as `StorageError::NotFound`.
pub fn delete(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| StorageError::from_io(path, e))?;
    debug!("Deleted {}", path.display());
    Ok(())
}

/// Append text to a file, creating it if absent
///
/// The text is written as-is; callers add their own line terminator.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StorageError::from_io(path, e))?;

    file.write_all(text.as_bytes())
        .map_err(|e| StorageError::from_io(path, e))
}

/// Read a whole file as UTF-8 text
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| StorageError::from_io(path, e))
}

/// Read a file and split it into lines (terminators stripped)
///
/// A missing file reads as empty.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    match read_text(path) {
        Ok(text) => Ok(text.lines().map(str::to_string).collect()),
        Err(StorageError::NotFound { .. }) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Create or truncate a file with the given contents
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| StorageError::from_io(path, e))
}

/// Create a directory and any missing parents
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(StorageError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    fs::create_dir_all(path).map_err(|e| StorageError::from_io(path, e))
}

/// List regular files directly inside `dir` (no recursion), sorted by name
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(StorageError::NotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(StorageError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            StorageError::from_io(path, e.into())
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Whether an existing path is a directory
///
/// Unlike [`Path::is_dir`], a missing or unreadable path is an error.
pub fn is_dir(path: &Path) -> Result<bool> {
    let meta = fs::metadata(path).map_err(|e| StorageError::from_io(path, e))?;
    Ok(meta.is_dir())
}
