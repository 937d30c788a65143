//! File events and normalisation of raw notifications
//!
//! Backends report renames differently:
//! - inotify sends `From` then `To` (sharing a cookie) and then a combined `Both`
//! - ReadDirectoryChangesW sends `From` then `To` with no cookie
//! - FSEvents sends `Any` for each side of the rename
//!
//! [`EventNormalizer`] folds all of these into at most one [`FileEvent`] per
//! change so each file triggers a single reaction.

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a rename `From` waits for its `To` before it counts as a move out
pub const RENAME_PAIR_WINDOW: Duration = Duration::from_millis(50);

/// A change in the watched directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// A file appeared (created or moved in)
    Created { name: String, path: PathBuf },
    /// A file disappeared (deleted or moved out)
    Deleted { name: String, path: PathBuf },
    /// A file was renamed within the directory; `path` is the new location
    Renamed {
        old_name: String,
        new_name: String,
        path: PathBuf,
    },
    /// The notification source reported a problem
    Error { message: String },
}

impl FileEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        FileEvent::Created {
            name: file_name(&path),
            path,
        }
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        FileEvent::Deleted {
            name: file_name(&path),
            path,
        }
    }

    pub fn renamed(from: &Path, to: impl Into<PathBuf>) -> Self {
        let path = to.into();
        FileEvent::Renamed {
            old_name: file_name(from),
            new_name: file_name(&path),
            path,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        FileEvent::Error {
            message: message.into(),
        }
    }

    /// File names this event refers to
    pub fn names(&self) -> Vec<&str> {
        match self {
            FileEvent::Created { name, .. } | FileEvent::Deleted { name, .. } => vec![name.as_str()],
            FileEvent::Renamed {
                old_name, new_name, ..
            } => vec![old_name.as_str(), new_name.as_str()],
            FileEvent::Error { .. } => Vec::new(),
        }
    }
}

/// Final path component as a string (whole path if there is none)
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Rename `From` waiting for its partner
#[derive(Debug)]
struct PendingRename {
    tracker: Option<usize>,
    path: PathBuf,
    seen_at: Instant,
}

/// Turns raw `notify` results into [`FileEvent`]s
#[derive(Debug)]
pub struct EventNormalizer {
    /// Watched directory (canonical)
    root: PathBuf,

    /// Unpaired rename source
    pending_from: Option<PendingRename>,

    /// Last rename emitted from a `From`/`To` pair, so the trailing `Both`
    /// for the same pair is not reported twice
    last_pair: Option<(PathBuf, PathBuf)>,
}

impl EventNormalizer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pending_from: None,
            last_pair: None,
        }
    }

    /// Feed one raw notification, returning the events it completes
    pub fn push(&mut self, raw: notify::Result<Event>) -> Vec<FileEvent> {
        let event = match raw {
            Ok(event) => event,
            Err(e) => {
                let mut out = self.flush();
                out.push(FileEvent::error(e.to_string()));
                return out;
            }
        };

        let tracker = event.tracker();
        let mut out = Vec::new();

        match event.kind {
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                out.extend(self.flush());
                if let Some(path) = event.paths.into_iter().next() {
                    self.pending_from = Some(PendingRename {
                        tracker,
                        path,
                        seen_at: Instant::now(),
                    });
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                let Some(to) = event.paths.into_iter().next() else {
                    return out;
                };
                match self.pending_from.take() {
                    Some(from) if from.tracker == tracker => {
                        out.push(FileEvent::renamed(&from.path, to.clone()));
                        self.last_pair = Some((from.path, to));
                    }
                    unpaired => {
                        self.pending_from = unpaired;
                        out.extend(self.flush());
                        out.push(FileEvent::created(to));
                    }
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                let mut paths = event.paths.into_iter();
                if let (Some(from), Some(to)) = (paths.next(), paths.next()) {
                    let pair = (from, to);
                    if self.last_pair.as_ref() == Some(&pair) {
                        self.last_pair = None;
                    } else {
                        out.extend(self.flush());
                        out.push(FileEvent::renamed(&pair.0, pair.1));
                    }
                }
            }
            EventKind::Modify(ModifyKind::Name(_)) => {
                out.extend(self.flush());
                for path in event.paths {
                    if path.exists() {
                        out.push(FileEvent::created(path));
                    } else {
                        out.push(FileEvent::deleted(path));
                    }
                }
            }
            EventKind::Create(CreateKind::Folder) => {
                out.extend(self.flush());
            }
            EventKind::Create(_) => {
                out.extend(self.flush());
                out.extend(event.paths.into_iter().map(FileEvent::created));
            }
            EventKind::Remove(_) => {
                out.extend(self.flush());
                for path in event.paths {
                    if path == self.root {
                        out.push(FileEvent::error(format!(
                            "watch directory {} was removed",
                            self.root.display()
                        )));
                    } else {
                        out.push(FileEvent::deleted(path));
                    }
                }
            }
            other => {
                debug!("Ignoring {:?} on {:?}", other, event.paths);
            }
        }

        out
    }

    /// Resolve an unpaired rename source as a move out of the directory
    pub fn flush(&mut self) -> Vec<FileEvent> {
        self.pending_from
            .take()
            .map(|from| vec![FileEvent::deleted(from.path)])
            .unwrap_or_default()
    }

    /// When the pending rename source should be flushed, if there is one
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending_from
            .as_ref()
            .map(|from| from.seen_at + RENAME_PAIR_WINDOW)
    }
}
