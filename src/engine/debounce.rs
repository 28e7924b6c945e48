// src/engine/debounce.rs

//! Restart-storm suppression.
//!
//! Bursts of change events (an editor writing several files, a directory
//! bulk-update) are coalesced into a single delayed restart trigger. The
//! pending deadline is owned by exactly one task: re-arming replaces the
//! deadline (last event wins) and never stacks a second timer, so the old
//! and the new deadline can never both fire.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::engine::runtime::SupervisorEvent;

/// Sender half used by the watcher to report qualifying change events.
#[derive(Debug, Clone)]
pub struct DebounceHandle {
    poke_tx: mpsc::Sender<()>,
}

impl DebounceHandle {
    /// Report one qualifying filesystem event.
    ///
    /// Cancels any previously armed deadline and arms a new one a full
    /// debounce window away. With a zero window the restart request is
    /// forwarded immediately.
    ///
    /// Errors only when the scheduler task has shut down.
    pub async fn notify(&self) -> Result<(), mpsc::error::SendError<()>> {
        self.poke_tx.send(()).await
    }
}

/// Spawn the debounce task and return the handle the watcher pokes.
///
/// Exactly one `RestartRequested` is emitted per quiet period, timed from
/// the *last* qualifying event rather than the first.
pub fn spawn_debouncer(
    window: Duration,
    events_tx: mpsc::Sender<SupervisorEvent>,
) -> DebounceHandle {
    let (poke_tx, mut poke_rx) = mpsc::channel::<()>(64);

    tokio::spawn(async move {
        while poke_rx.recv().await.is_some() {
            if window.is_zero() {
                debug!("debounce window is zero; requesting restart immediately");
                if events_tx
                    .send(SupervisorEvent::RestartRequested)
                    .await
                    .is_err()
                {
                    return;
                }
                continue;
            }

            let mut deadline = Instant::now() + window;
            debug!(window_secs = window.as_secs(), "restart deadline armed");

            loop {
                tokio::select! {
                    () = sleep_until(deadline) => {
                        info!("quiet period elapsed; requesting restart");
                        if events_tx
                            .send(SupervisorEvent::RestartRequested)
                            .await
                            .is_err()
                        {
                            return;
                        }
                        break;
                    }
                    poke = poke_rx.recv() => match poke {
                        Some(()) => {
                            deadline = Instant::now() + window;
                            debug!("further change within window; restart deadline re-armed");
                        }
                        None => return,
                    },
                }
            }
        }

        debug!("debounce task ended");
    });

    DebounceHandle { poke_tx }
}
