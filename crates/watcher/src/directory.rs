//! The directory watcher and its dispatch loop

use crate::event::{EventNormalizer, FileEvent};
use crate::handler::{self, DeleteAction};
use crate::log::EventLog;
use crate::pattern::NamePattern;
use crate::{WatchConfig, WatchError};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

/// Watches one directory and deletes files matching a name pattern
///
/// Raw notifications flow from the `notify` backend thread through an
/// unbounded channel into a single dispatch task. The dispatch task logs
/// each relevant event in delivery order and hands deletes to their own
/// tasks, so the grace delay never holds up the next notification.
///
/// Must be started from within a tokio runtime.
pub struct DirectoryWatcher {
    config: WatchConfig,
    /// Canonical watch directory
    directory: PathBuf,
    log: Arc<EventLog>,
    running: Option<Running>,
}

/// Resources that exist only while watching
struct Running {
    source: RecommendedWatcher,
    shutdown: oneshot::Sender<()>,
    dispatch: JoinHandle<()>,
}

impl DirectoryWatcher {
    /// Validate the configuration and begin watching
    ///
    /// Fails with [`WatchError::Config`] when the directory is missing,
    /// not a directory, or cannot be watched, and with
    /// [`WatchError::Pattern`] for an unusable pattern.
    pub async fn start(config: WatchConfig) -> Result<Self, WatchError> {
        let directory = config.resolve_directory()?;
        let pattern = NamePattern::new(config.pattern())?;
        let log = Arc::new(EventLog::new(config.log_path(), config.echo()));

        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let mut source = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                // Receiver gone means we are shutting down
                let _ = raw_tx.send(res);
            },
            notify::Config::default(),
        )
        .map_err(|e| WatchError::config(&directory, e))?;

        source
            .watch(&directory, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::config(&directory, e))?;

        // Notifications arriving before the dispatcher runs wait in the channel
        log.log(handler::started_message(&directory));

        let dispatcher = Dispatcher {
            normalizer: EventNormalizer::new(&directory),
            pattern,
            log: Arc::clone(&log),
            grace_delay: config.grace_delay(),
            log_name: config.log_name_in(&directory),
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let dispatch = tokio::spawn(dispatcher.run(raw_rx, shutdown_rx));

        info!(
            "Watching {} for {} (grace delay {:?})",
            directory.display(),
            config.pattern(),
            config.grace_delay()
        );

        Ok(Self {
            config,
            directory,
            log,
            running: Some(Running {
                source,
                shutdown: shutdown_tx,
                dispatch,
            }),
        })
    }

    /// Stop watching
    ///
    /// Notification delivery ends immediately; deletes already scheduled
    /// are allowed to finish before the stop message is logged. Calling
    /// this again is a no-op.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            debug!("Watcher for {} already stopped", self.directory.display());
            return;
        };

        drop(running.source);
        let _ = running.shutdown.send(());

        if let Err(e) = running.dispatch.await {
            warn!("Dispatch task ended abnormally: {}", e);
        }

        self.log.log(handler::stopped_message(&self.directory));
        info!("Stopped watching {}", self.directory.display());
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Canonical path of the watched directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        // Without an await point we can only cut delivery; scheduled
        // deletes finish on the runtime in the background.
        if let Some(running) = self.running.take() {
            drop(running.source);
            let _ = running.shutdown.send(());
        }
    }
}

/// State owned by the dispatch task
struct Dispatcher {
    normalizer: EventNormalizer,
    pattern: NamePattern,
    log: Arc<EventLog>,
    grace_delay: Duration,
    /// Log file name when the log lives in the watched directory
    log_name: Option<String>,
}

impl Dispatcher {
    async fn run(
        mut self,
        mut raw_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let mut deletes = JoinSet::new();

        loop {
            let flush_at = self
                .normalizer
                .pending_deadline()
                .map(tokio::time::Instant::from_std);

            tokio::select! {
                biased;

                _ = &mut shutdown => break,

                raw = raw_rx.recv() => match raw {
                    Some(raw) => {
                        for event in self.normalizer.push(raw) {
                            self.dispatch(event, &mut deletes);
                        }
                    }
                    None => break,
                },

                _ = tokio::time::sleep_until(flush_at.unwrap_or_else(tokio::time::Instant::now)),
                    if flush_at.is_some() =>
                {
                    for event in self.normalizer.flush() {
                        self.dispatch(event, &mut deletes);
                    }
                }

                Some(joined) = deletes.join_next(), if !deletes.is_empty() => {
                    if let Err(e) = joined {
                        warn!("Deferred delete task failed: {}", e);
                    }
                }
            }
        }

        // Let in-flight deletes finish so their outcome is logged
        while let Some(joined) = deletes.join_next().await {
            if let Err(e) = joined {
                warn!("Deferred delete task failed: {}", e);
            }
        }
    }

    fn dispatch(&self, event: FileEvent, deletes: &mut JoinSet<()>) {
        if let Some(log_name) = &self.log_name {
            if event.names().contains(&log_name.as_str()) {
                return;
            }
        }

        let Some(reaction) = handler::react(&event, &self.pattern) else {
            debug!("Filtered out {:?}", event);
            return;
        };

        self.log.log(reaction.message);

        if let Some(action) = reaction.action {
            deletes.spawn(deferred_delete(action, Arc::clone(&self.log), self.grace_delay));
        }
    }
}

/// Wait out the grace delay, try the delete once, log the outcome
async fn deferred_delete(action: DeleteAction, log: Arc<EventLog>, grace_delay: Duration) {
    tokio::time::sleep(grace_delay).await;

    let result = action.execute();
    if let Err(e) = &result {
        debug!("{}", e);
    }
    log.log(action.outcome_message(&result));
}
