//! Watcher configuration

use crate::WatchError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default pause between seeing a file and deleting it
pub const DEFAULT_GRACE_DELAY: Duration = Duration::from_millis(100);

/// Default watched name pattern
pub const DEFAULT_PATTERN: &str = "*.tmp";

/// What to watch, what to match, and where to log
///
/// Immutable once handed to [`DirectoryWatcher::start`](crate::DirectoryWatcher::start).
#[derive(Debug, Clone)]
pub struct WatchConfig {
    directory: PathBuf,
    pattern: String,
    log_path: PathBuf,
    grace_delay: Duration,
    echo: bool,
}

impl WatchConfig {
    pub fn new(
        directory: impl Into<PathBuf>,
        pattern: impl Into<String>,
        log_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            directory: directory.into(),
            pattern: pattern.into(),
            log_path: log_path.into(),
            grace_delay: DEFAULT_GRACE_DELAY,
            echo: true,
        }
    }

    /// Override the grace delay before deferred deletes
    pub fn with_grace_delay(mut self, grace_delay: Duration) -> Self {
        self.grace_delay = grace_delay;
        self
    }

    /// Mirror log lines to stdout (default: on)
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn grace_delay(&self) -> Duration {
        self.grace_delay
    }

    pub fn echo(&self) -> bool {
        self.echo
    }

    /// Check that the watch directory exists and can be listed
    ///
    /// Returns the canonical directory path, which is what the
    /// notification source reports events against.
    pub(crate) fn resolve_directory(&self) -> Result<PathBuf, WatchError> {
        let dir = &self.directory;

        if !storage::exists(dir) {
            return Err(WatchError::config(dir, "directory does not exist"));
        }

        if !storage::is_dir(dir).map_err(|e| WatchError::config(dir, e))? {
            return Err(WatchError::config(dir, "not a directory"));
        }

        // Listing proves read access
        storage::list_files(dir).map_err(|e| WatchError::config(dir, e))?;

        dir.canonicalize().map_err(|e| WatchError::config(dir, e))
    }

    /// File name of the log, when the log lives inside the watched directory
    pub(crate) fn log_name_in(&self, canonical_dir: &Path) -> Option<String> {
        let name = self.log_path.file_name()?;
        let parent = match self.log_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let parent = parent.canonicalize().ok()?;

        (parent.as_path() == canonical_dir).then(|| name.to_string_lossy().into_owned())
    }
}
