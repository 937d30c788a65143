//! Storage error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the storage helpers
#[derive(Debug, Error)]
pub enum StorageError {
    /// The path does not exist
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The path exists but is not what the operation expects
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Any other I/O failure, with the path it happened on
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Wrap an I/O error, mapping `NotFound` to the dedicated variant
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound { path },
            _ => StorageError::Io { path, source },
        }
    }
}
