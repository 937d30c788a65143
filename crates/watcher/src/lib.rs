//! Temporary-file watching for tmpwatch
//!
//! This crate watches a single directory (non-recursively) and removes
//! files whose names match a glob pattern:
//! - Notification normalisation across inotify / FSEvents / ReadDirectoryChangesW
//! - Case-insensitive name filtering
//! - Grace-delayed, single-attempt deletes off the dispatch path
//! - Append-only plain-text event log mirrored to stdout
//! - One-shot sweep of files that matched before watching began

pub mod config;
pub mod directory;
pub mod error;
pub mod event;
pub mod handler;
pub mod log;
pub mod pattern;
pub mod sweep;

// Re-exports
pub use config::{WatchConfig, DEFAULT_GRACE_DELAY, DEFAULT_PATTERN};
pub use directory::DirectoryWatcher;
pub use error::WatchError;
pub use event::FileEvent;
pub use log::{read_entries, EventLog, LogEntry};
pub use pattern::NamePattern;
pub use sweep::{sweep_existing, SweepReport};
