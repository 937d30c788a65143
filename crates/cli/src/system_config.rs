//! User configuration
//!
//! Read from `<config dir>/tmpwatch/config.toml` (or `--config`). Every
//! key is optional; command-line flags win over file values, which win
//! over built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use watcher::{WatchConfig, DEFAULT_GRACE_DELAY, DEFAULT_PATTERN};

/// Largest accepted grace delay
const MAX_GRACE_MS: u64 = 60_000;

/// Contents of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[watch]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Directory to watch (default: <Documents>/TempFilesWatch)
    pub directory: Option<PathBuf>,

    /// File-name glob to delete (default: *.tmp)
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Log file (default: <Documents>/file_watcher.log)
    pub log_file: Option<PathBuf>,

    /// Delay before deleting a new file, in milliseconds (default: 100)
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            directory: None,
            pattern: default_pattern(),
            log_file: None,
            grace_ms: default_grace_ms(),
        }
    }
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_grace_ms() -> u64 {
    DEFAULT_GRACE_DELAY.as_millis() as u64
}

impl SystemConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.watch.pattern.trim().is_empty() {
            anyhow::bail!("watch.pattern must not be empty");
        }
        if self.watch.grace_ms > MAX_GRACE_MS {
            anyhow::bail!(
                "watch.grace_ms must be between 0 and {} (got {})",
                MAX_GRACE_MS,
                self.watch.grace_ms
            );
        }
        Ok(())
    }

    /// Apply command-line overrides and fill in defaults
    pub fn resolve(&self, overrides: &Overrides) -> Result<Settings> {
        let mut merged = self.clone();
        if let Some(pattern) = &overrides.pattern {
            merged.watch.pattern = pattern.clone();
        }
        if let Some(grace_ms) = overrides.grace_ms {
            merged.watch.grace_ms = grace_ms;
        }
        merged.validate().context("Invalid watch settings")?;

        Ok(Settings {
            directory: overrides
                .dir
                .clone()
                .or(merged.watch.directory)
                .unwrap_or_else(default_watch_dir),
            pattern: merged.watch.pattern,
            log_file: overrides
                .log_file
                .clone()
                .or(merged.watch.log_file)
                .unwrap_or_else(default_log_file),
            grace_delay: Duration::from_millis(merged.watch.grace_ms),
        })
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dir: Option<PathBuf>,
    pub pattern: Option<String>,
    pub log_file: Option<PathBuf>,
    pub grace_ms: Option<u64>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub directory: PathBuf,
    pub pattern: String,
    pub log_file: PathBuf,
    pub grace_delay: Duration,
}

impl Settings {
    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig::new(&self.directory, &self.pattern, &self.log_file)
            .with_grace_delay(self.grace_delay)
    }
}

/// Base directory for the default watch folder and log
fn documents_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_watch_dir() -> PathBuf {
    documents_dir().join("TempFilesWatch")
}

pub fn default_log_file() -> PathBuf {
    documents_dir().join("file_watcher.log")
}

/// Default location of the config file
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tmpwatch").join("config.toml"))
}

/// Parse a config file
pub fn load_from(path: &Path) -> Result<SystemConfig> {
    let text = storage::read_text(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: SystemConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration
///
/// An explicit path must exist; the default path is optional.
pub fn load(explicit: Option<&Path>) -> Result<SystemConfig> {
    if let Some(path) = explicit {
        return load_from(path);
    }

    match config_file_path() {
        Some(path) if storage::exists(&path) => load_from(&path),
        _ => Ok(SystemConfig::default()),
    }
}

/// Write the example config to the default location if nothing is there yet
pub fn init_if_missing() -> Result<PathBuf> {
    let path = config_file_path().context("Could not determine config directory")?;
    if !storage::exists(&path) {
        if let Some(parent) = path.parent() {
            storage::ensure_dir(parent)?;
        }
        storage::write_text(&path, &example_config())?;
    }
    Ok(path)
}

/// Commented example config with the defaults filled in
pub fn example_config() -> String {
    format!(
        r#"# tmpwatch configuration

[watch]
# Directory to watch (non-recursive)
# directory = "{dir}"

# File-name glob; matching files are deleted
pattern = "{pattern}"

# Append-only log file
# log_file = "{log}"

# Delay before deleting a newly created file (0-{max} ms)
grace_ms = {grace}
"#,
        dir = default_watch_dir().display(),
        pattern = DEFAULT_PATTERN,
        log = default_log_file().display(),
        max = MAX_GRACE_MS,
        grace = default_grace_ms(),
    )
}
