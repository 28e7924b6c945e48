// src/engine/runtime.rs

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::exec::ProcessController;
use crate::notifier::Notifier;

/// Events sent into the runtime from the debounce scheduler and the signal
/// handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorEvent {
    RestartRequested,
    ShutdownRequested,
}

/// Supervision lifecycle states.
///
/// Transitions are logged; an event that does not match a defined
/// transition is ignored, not fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Starting,
    Running,
    Restarting,
    ShuttingDown,
    Terminated,
}

/// Options that influence the restart cycle.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// Delay between a restart trigger firing and the stop/start cycle.
    pub restart_delay: Duration,
}

#[derive(Debug, PartialEq, Eq)]
enum CycleOutcome {
    Continue,
    Shutdown,
}

/// The supervision loop.
///
/// Owns the single process slot (through `ProcessController`) and consumes
/// `SupervisorEvent`s. Restarts are serialized: stop always completes
/// before the next start begins, and triggers arriving during an active
/// cycle are coalesced into at most one further restart instead of
/// stacking.
pub struct Runtime {
    controller: ProcessController,
    notifier: Notifier,
    options: RuntimeOptions,
    state: SupervisorState,

    /// Unified event stream from the debouncer and the signal handler.
    events_rx: mpsc::Receiver<SupervisorEvent>,
}

impl Runtime {
    pub fn new(
        controller: ProcessController,
        notifier: Notifier,
        options: RuntimeOptions,
        events_rx: mpsc::Receiver<SupervisorEvent>,
    ) -> Self {
        Self {
            controller,
            notifier,
            options,
            state: SupervisorState::Idle,
            events_rx,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Main event loop.
    ///
    /// Starts the worker once, then supervises until a shutdown event
    /// arrives. On return the process slot is empty and the state is
    /// `Terminated`.
    pub async fn run(mut self) -> Result<()> {
        info!("watchbot runtime started");

        self.transition(SupervisorState::Starting);
        self.controller.start().await;
        self.transition(SupervisorState::Running);

        while let Some(event) = self.events_rx.recv().await {
            debug!(?event, "runtime received event");

            match event {
                SupervisorEvent::RestartRequested => {
                    if self.state != SupervisorState::Running {
                        warn!(state = ?self.state, "restart request ignored in current state");
                        continue;
                    }
                    if self.restart_cycle().await == CycleOutcome::Shutdown {
                        break;
                    }
                }
                SupervisorEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping runtime");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// One restart: wait the configured delay, coalesce any further restart
    /// triggers that arrived meanwhile, then stop and start the worker.
    async fn restart_cycle(&mut self) -> CycleOutcome {
        self.transition(SupervisorState::Restarting);

        if !self.options.restart_delay.is_zero() {
            info!(
                delay_secs = self.options.restart_delay.as_secs(),
                "waiting before restarting worker"
            );
            tokio::time::sleep(self.options.restart_delay).await;
        }

        // Triggers queued up to this point collapse into this cycle instead
        // of stacking one restart per event. A queued shutdown wins.
        if self.drain_pending_events() == CycleOutcome::Shutdown {
            info!("shutdown requested during restart; skipping restart");
            return CycleOutcome::Shutdown;
        }

        self.notifier.worker_restarting().await;
        self.controller.stop().await;
        self.controller.start().await;

        self.transition(SupervisorState::Running);
        CycleOutcome::Continue
    }

    fn drain_pending_events(&mut self) -> CycleOutcome {
        let mut collapsed = 0usize;
        loop {
            match self.events_rx.try_recv() {
                Ok(SupervisorEvent::RestartRequested) => collapsed += 1,
                Ok(SupervisorEvent::ShutdownRequested) => return CycleOutcome::Shutdown,
                Err(_) => break,
            }
        }
        if collapsed > 0 {
            debug!(collapsed, "collapsed queued restart triggers into current cycle");
        }
        CycleOutcome::Continue
    }

    async fn shutdown(&mut self) {
        self.transition(SupervisorState::ShuttingDown);
        self.controller.stop().await;
        self.transition(SupervisorState::Terminated);
        info!("watchbot runtime exiting");
    }

    fn transition(&mut self, next: SupervisorState) {
        debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }
}
