//! FileSystem Actor
//!
//! Watches the glob bases of every binding and tells the RunnerActor
//! which steps to re-run.
//!
//! Architecture:
//! ```text
//! Watcher → Debouncer (pure timing) → bindings (path → category) → RunnerMsg
//! ```

use std::path::PathBuf;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::RunnerMsg;

// Path → category matching.
mod bindings;
// Pure timing and deduplication.
mod debouncer;
// Shared fs event types.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;

#[cfg(test)]
mod tests;

pub use bindings::{WatchBinding, affected, watch_roots};
use debouncer::Debouncer;
use watch_roots::WatchRoots;

/// How often missing watch roots are re-checked while idle.
const PENDING_ROOT_POLL: Duration = Duration::from_secs(1);
/// Idle wake-up when every root is attached.
const IDLE: Duration = Duration::from_secs(86400);

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Watch-root consistency layer (attach/re-attach root directories)
    watch_roots: WatchRoots,
    /// Channel to send messages to RunnerActor
    runner_tx: mpsc::Sender<RunnerMsg>,
    /// Debouncer state
    debouncer: Debouncer,
    /// Registered once; never change while watching
    bindings: Vec<WatchBinding>,
}

impl FsActor {
    /// Create a new FsActor, watching `roots` immediately.
    ///
    /// Events buffer in the notify channel until `run` is polled.
    pub fn new(
        roots: Vec<PathBuf>,
        bindings: Vec<WatchBinding>,
        runner_tx: mpsc::Sender<RunnerMsg>,
    ) -> notify::Result<Self> {
        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        // Missing roots are attached once they appear
        let mut watch_roots = WatchRoots::new(roots);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            runner_tx,
            debouncer: Debouncer::new(),
            bindings,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let runner_tx = self.runner_tx;
        let bindings = self.bindings;
        let mut debouncer = self.debouncer;
        let mut watcher = self.watcher;
        let mut watch_roots = self.watch_roots;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Bridge the blocking notify channel into tokio
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            let idle = if watch_roots.has_pending() {
                PENDING_ROOT_POLL
            } else {
                IDLE
            };

            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration(idle)) => {
                    watch_roots.maintain(&mut watcher);
                    if dispatch_changes(&mut debouncer, &bindings, &runner_tx).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Send one `Run` per affected category.
///
/// Returns `Err(())` if the RunnerActor shut down
async fn dispatch_changes(
    debouncer: &mut Debouncer,
    bindings: &[WatchBinding],
    runner_tx: &mpsc::Sender<RunnerMsg>,
) -> Result<(), ()> {
    let Some(changes) = debouncer.take_if_ready() else {
        return Ok(());
    };

    let categories = affected(bindings, changes.keys().map(PathBuf::as_path));
    if categories.is_empty() {
        crate::debug!("watch"; "{} change(s) matched no binding", changes.len());
        return Ok(());
    }

    for category in categories {
        crate::debug!("watch"; "re-running {}", category);
        runner_tx
            .send(RunnerMsg::Run(category))
            .await
            .map_err(|_| ())?;
    }

    Ok(())
}
