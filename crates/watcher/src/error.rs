//! Watcher error types

use std::path::{Path, PathBuf};
use storage::StorageError;
use thiserror::Error;

/// Errors raised by the directory watcher
///
/// Only `Config` and `Pattern` ever reach the caller of
/// [`DirectoryWatcher::start`](crate::DirectoryWatcher::start). Delete and
/// log-write failures happen while handling events; they are recorded and
/// watching continues.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The watch directory is missing, not a directory, or cannot be watched
    #[error("cannot watch {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// The name pattern is not a usable file-name glob
    #[error("invalid name pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    /// A deferred delete failed
    #[error("failed to delete {name}: {source}")]
    Delete {
        name: String,
        #[source]
        source: StorageError,
    },

    /// Appending to the event log failed
    #[error("failed to write log entry to {}: {source}", path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: StorageError,
    },
}

impl WatchError {
    pub(crate) fn config(path: &Path, reason: impl ToString) -> Self {
        WatchError::Config {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn pattern(pattern: &str, reason: impl ToString) -> Self {
        WatchError::Pattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}
