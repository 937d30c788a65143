//! Show recent log entries

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use watcher::{read_entries, LogEntry};

pub async fn run(log_file: &Path, limit: usize) -> Result<()> {
    let entries = read_entries(log_file)
        .with_context(|| format!("Failed to read log {}", log_file.display()))?;

    if entries.is_empty() {
        println!("No log entries in {}", log_file.display());
        return Ok(());
    }

    let skip = entries.len().saturating_sub(limit);
    for entry in &entries[skip..] {
        display_entry(entry);
    }

    if skip > 0 {
        println!(
            "{}",
            format!("({} earlier entries not shown)", skip).dimmed()
        );
    }

    Ok(())
}

fn display_entry(entry: &LogEntry) {
    let stamp = entry.timestamp.format(watcher::log::TIMESTAMP_FORMAT).to_string();

    match classify(&entry.message) {
        Kind::Failure => println!("{} {}", stamp.dimmed(), entry.message.red()),
        Kind::Deleted => println!("{} {}", stamp.dimmed(), entry.message.green()),
        Kind::Detected => println!("{} {}", stamp.dimmed(), entry.message.yellow()),
        Kind::Other => println!("{} {}", stamp.dimmed(), entry.message),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Kind {
    Failure,
    Deleted,
    Detected,
    Other,
}

fn classify(message: &str) -> Kind {
    if message.starts_with("Error") || message.starts_with("File watcher error") {
        Kind::Failure
    } else if message.ends_with("deleted successfully")
        || message.ends_with(" deleted")
        || message.starts_with("Removed existing")
    {
        Kind::Deleted
    } else if message.starts_with("Detected") || message.contains(" renamed to ") {
        Kind::Detected
    } else {
        Kind::Other
    }
}
