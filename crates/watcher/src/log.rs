//! Append-only event log
//!
//! One entry per line, `YYYY-MM-DD HH:MM:SS - message`, local time.
//! Control characters in messages are escaped so a file name can never
//! split an entry across lines.

use crate::WatchError;
use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use storage::StorageError;
use tracing::warn;

/// Timestamp layout of every log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator between timestamp and message
const SEPARATOR: &str = " - ";

/// A single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

impl LogEntry {
    /// Entry stamped with the current local time
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            message: escape_controls(&message.into()),
        }
    }

    /// Parse a line written by [`EventLog`]
    pub fn parse(line: &str) -> Option<Self> {
        let (stamp, message) = line.split_once(SEPARATOR)?;
        let timestamp = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
        Some(Self {
            timestamp,
            message: message.trim_end_matches(['\r', '\n']).to_string(),
        })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            SEPARATOR,
            self.message
        )
    }
}

/// Replace line breaks and other control characters with escapes
///
/// Tabs are kept as they are.
pub fn escape_controls(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push(c),
            c if c.is_control() => escaped.extend(c.escape_default()),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Read every parseable entry from a log file, oldest first
///
/// A missing log reads as empty; lines that do not parse are skipped.
pub fn read_entries(path: &Path) -> Result<Vec<LogEntry>, StorageError> {
    Ok(storage::read_lines(path)?
        .iter()
        .filter_map(|line| LogEntry::parse(line))
        .collect())
}

/// Writer for the watcher's log file
///
/// Deferred deletes log from their own tasks, so writes are serialised
/// with a mutex; a line is never interleaved with another.
///
/// The stdout mirror switches itself off after the first failed write
/// (for example a closed pipe); the log file keeps being written.
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    echo: AtomicBool,
    write_lock: Mutex<()>,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>, echo: bool) -> Self {
        Self {
            path: path.into(),
            echo: AtomicBool::new(echo),
            write_lock: Mutex::new(()),
        }
    }

    /// Whether entries are still mirrored to stdout
    pub fn echoing(&self) -> bool {
        self.echo.load(Ordering::Relaxed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry, reporting failures to stderr only
    pub fn log(&self, message: impl Into<String>) {
        if let Err(e) = self.try_log(message) {
            warn!("{}", e);
            eprintln!("Error writing to log: {}", e);
        }
    }

    /// Append an entry and mirror it to stdout
    ///
    /// The stdout mirror happens even when the file write fails.
    pub fn try_log(&self, message: impl Into<String>) -> Result<LogEntry, WatchError> {
        let entry = LogEntry::now(message);
        let line = entry.to_string();

        let _guard = self.write_lock.lock();

        let written = storage::append_text(&self.path, &format!("{}\n", line));
        if self.echoing() {
            self.echo_line(&line, std::io::stdout().lock());
        }

        written.map_err(|source| WatchError::LogWrite {
            path: self.path.clone(),
            source,
        })?;
        Ok(entry)
    }

    fn echo_line(&self, line: &str, mut out: impl Write) {
        if let Err(e) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
            self.echo.store(false, Ordering::Relaxed);
            warn!("Stopped mirroring log to stdout: {}", e);
            eprintln!("Error writing to stdout: {}", e);
        }
    }
}
