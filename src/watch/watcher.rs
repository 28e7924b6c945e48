// src/watch/watcher.rs

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::DebounceHandle;
use crate::watch::filter::WatchPlan;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher for every root in the plan and forward
/// qualifying change events to the debounce scheduler.
///
/// - `plan` carries the subscription roots and the path filter.
/// - `debounce` is poked once per qualifying event.
pub fn spawn_watcher(plan: WatchPlan, debounce: DebounceHandle) -> Result<WatcherHandle> {
    let WatchPlan { roots, filter } = plan;

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("watchbot: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("watchbot: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    for root in &roots {
        let mode = if root.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&root.dir, mode)?;
        info!(dir = ?root.dir, recursive = root.recursive, "file watcher started");
    }

    // Async task that consumes notify events and pokes the debouncer for
    // every qualifying change.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            if !is_change_kind(&event.kind) {
                continue;
            }

            for path in &event.paths {
                // Directory events never qualify.
                if path.is_dir() {
                    continue;
                }

                if filter.qualifies(path) {
                    info!(path = ?path, "change detected on watched path");
                    if debounce.notify().await.is_err() {
                        warn!("debounce scheduler is gone; stopping watch loop");
                        return;
                    }
                } else {
                    debug!(path = ?path, "change outside watch set; ignored");
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Content modification and file creation qualify; renames, removals and
/// metadata-only events do not.
fn is_change_kind(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}
