//! File storage helpers for tmpwatch
//!
//! This crate provides the plain file operations the watcher relies on:
//! - Existence checks and single-file deletion
//! - Append-only text writes (one line per call)
//! - Whole-file text reads and writes
//! - Shallow directory listing and directory checks

pub mod error;
pub mod fs;

// Re-exports
pub use error::StorageError;
pub use fs::{
    append_text, delete, ensure_dir, exists, is_dir, list_files, read_lines, read_text,
    write_text,
};

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
