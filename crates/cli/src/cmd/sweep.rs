//! Delete matching files already in the directory

use crate::system_config::Settings;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use watcher::EventLog;

pub async fn run(settings: Settings) -> Result<()> {
    crate::util::ensure_parent_dir(&settings.log_file)?;

    let config = settings.watch_config();
    let log = EventLog::new(config.log_path(), config.echo());

    let report = watcher::sweep_existing(&config, &log).with_context(|| {
        format!("Failed to sweep {}", settings.directory.display())
    })?;

    if report.matched() == 0 {
        println!(
            "No files matching {} in {}",
            settings.pattern.cyan(),
            settings.directory.display()
        );
        return Ok(());
    }

    println!(
        "{} Removed {} of {} matching files",
        "✓".green(),
        report.deleted.len(),
        report.matched()
    );
    for (path, reason) in &report.failed {
        println!("  {} {}: {}", "✗".red(), path.display(), reason.dimmed());
    }

    Ok(())
}
