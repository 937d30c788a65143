//! One-shot sweep of files that already match
//!
//! Notifications only cover changes made after watching starts. A sweep
//! deletes matching files that were already sitting in the directory, using
//! the same single-attempt policy as event handling.

use crate::event::file_name;
use crate::handler::{DeleteAction, DeleteTrigger};
use crate::log::EventLog;
use crate::pattern::NamePattern;
use crate::{WatchConfig, WatchError};
use std::path::PathBuf;
use tracing::{debug, info};

/// Result of a sweep
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Files removed
    pub deleted: Vec<PathBuf>,
    /// Files that matched but could not be removed, with the cause
    pub failed: Vec<(PathBuf, String)>,
}

impl SweepReport {
    pub fn matched(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }
}

/// Delete every file in the configured directory that matches the pattern
///
/// Each outcome is written to `log`. The log file itself is never swept.
pub fn sweep_existing(config: &WatchConfig, log: &EventLog) -> Result<SweepReport, WatchError> {
    let directory = config.resolve_directory()?;
    let pattern = NamePattern::new(config.pattern())?;
    let log_name = config.log_name_in(&directory);

    let files = storage::list_files(&directory).map_err(|e| WatchError::config(&directory, e))?;
    let mut report = SweepReport::default();

    for path in files {
        let name = file_name(&path);
        if log_name.as_deref() == Some(name.as_str()) || !pattern.matches(&name) {
            continue;
        }

        let action = DeleteAction {
            name: name.clone(),
            path: path.clone(),
            trigger: DeleteTrigger::Created,
        };
        let result = action.execute();

        match &result {
            Ok(()) => {
                log.log(format!("Removed existing temporary file: {}", name));
                report.deleted.push(path);
            }
            Err(_) => {
                log.log(action.outcome_message(&result));
                report.failed.push((path, action.outcome_message(&result)));
            }
        }
    }

    if report.matched() == 0 {
        debug!("Sweep found no files matching {} in {}", pattern.as_str(), directory.display());
    } else {
        info!(
            "Sweep removed {} of {} matching files",
            report.deleted.len(),
            report.matched()
        );
    }

    Ok(report)
}
