//! Per-event reactions
//!
//! Handling is split in two so the decision is testable without a file
//! system: [`react`] maps an event to a log message and an optional
//! [`DeleteAction`], and the dispatch loop carries the action out after the
//! grace delay.

use crate::event::FileEvent;
use crate::pattern::NamePattern;
use crate::WatchError;
use std::path::{Path, PathBuf};

/// What caused a delete, which decides how its outcome is worded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTrigger {
    Created,
    Renamed,
}

/// A deferred single-attempt delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAction {
    pub name: String,
    pub path: PathBuf,
    pub trigger: DeleteTrigger,
}

impl DeleteAction {
    /// Try the delete once
    pub fn execute(&self) -> Result<(), WatchError> {
        storage::delete(&self.path).map_err(|source| WatchError::Delete {
            name: self.name.clone(),
            source,
        })
    }

    /// Log line describing the outcome of [`execute`](Self::execute)
    pub fn outcome_message(&self, result: &Result<(), WatchError>) -> String {
        match (self.trigger, result) {
            (DeleteTrigger::Created, Ok(())) => format!("File {} deleted successfully", self.name),
            (DeleteTrigger::Renamed, Ok(())) => format!("Renamed file {} deleted", self.name),
            (DeleteTrigger::Created, Err(e)) => format!("Error deleting file {}: {}", self.name, cause(e)),
            (DeleteTrigger::Renamed, Err(e)) => {
                format!("Error deleting renamed file {}: {}", self.name, cause(e))
            }
        }
    }
}

/// Underlying cause text, without the "failed to delete" prefix
fn cause(e: &WatchError) -> String {
    match e {
        WatchError::Delete { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

/// Log line plus follow-up work for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub message: String,
    pub action: Option<DeleteAction>,
}

impl Reaction {
    fn log_only(message: String) -> Self {
        Self {
            message,
            action: None,
        }
    }
}

/// Decide how to handle an event
///
/// Returns `None` for events the pattern filters out. Created and Deleted
/// pass when the name matches; Renamed passes when either name matches but
/// only schedules a delete when the new name has the pattern's extension.
pub fn react(event: &FileEvent, pattern: &NamePattern) -> Option<Reaction> {
    match event {
        FileEvent::Created { name, path } => {
            if !pattern.matches(name) {
                return None;
            }
            Some(Reaction {
                message: format!("Detected new temporary file: {}", name),
                action: Some(DeleteAction {
                    name: name.clone(),
                    path: path.clone(),
                    trigger: DeleteTrigger::Created,
                }),
            })
        }
        FileEvent::Deleted { name, .. } => {
            if !pattern.matches(name) {
                return None;
            }
            Some(Reaction::log_only(format!("File {} was removed", name)))
        }
        FileEvent::Renamed {
            old_name,
            new_name,
            path,
        } => {
            if !pattern.matches(old_name) && !pattern.matches(new_name) {
                return None;
            }
            let action = pattern.matches_extension(new_name).then(|| DeleteAction {
                name: new_name.clone(),
                path: path.clone(),
                trigger: DeleteTrigger::Renamed,
            });
            Some(Reaction {
                message: format!("File {} renamed to {}", old_name, new_name),
                action,
            })
        }
        FileEvent::Error { message } => {
            Some(Reaction::log_only(format!("File watcher error: {}", message)))
        }
    }
}

/// Log line written when watching starts
pub fn started_message(directory: &Path) -> String {
    format!("Started watching directory: {}", directory.display())
}

/// Log line written when watching stops
pub fn stopped_message(directory: &Path) -> String {
    format!("Stopped watching directory: {}", directory.display())
}
