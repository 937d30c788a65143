//! Watch a directory until the user quits

use crate::system_config::Settings;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::debug;
use watcher::{DirectoryWatcher, EventLog};

pub async fn run(settings: Settings, sweep_existing: bool, quiet: bool) -> Result<()> {
    storage::ensure_dir(&settings.directory).with_context(|| {
        format!(
            "Failed to create watch directory {}",
            settings.directory.display()
        )
    })?;
    crate::util::ensure_parent_dir(&settings.log_file)?;

    println!(
        "Watching for temporary files ({}) in: {}",
        settings.pattern.cyan(),
        settings.directory.display()
    );
    println!("Log file: {}", settings.log_file.display());
    println!("{}", "Type q and press Enter to quit...".dimmed());

    let config = settings.watch_config().with_echo(!quiet);

    if sweep_existing {
        let log = EventLog::new(config.log_path(), config.echo());
        let report = watcher::sweep_existing(&config, &log)
            .context("Failed to sweep existing files")?;
        debug!("Startup sweep removed {} files", report.deleted.len());
    }

    let mut watcher = DirectoryWatcher::start(config)
        .await
        .context("Failed to start watching")?;

    let waited = wait_for_quit().await;
    watcher.stop().await;
    waited
}

/// Block until `q` is entered on stdin or Ctrl+C is pressed
async fn wait_for_quit() -> Result<()> {
    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.recv(), if stdin_open => {
                match line.transpose().context("Failed to read from stdin")? {
                    Some(line) if is_quit(&line) => return Ok(()),
                    Some(_) => {}
                    None => {
                        debug!("stdin closed; waiting for Ctrl+C");
                        stdin_open = false;
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                return Ok(());
            }
        }
    }
}

/// Read stdin lines on a plain thread
///
/// A blocked read cannot be cancelled, so the thread is left detached and
/// never holds up runtime shutdown after Ctrl+C.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// Whether an input line is the quit key
pub fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("q")
}
