// src/exec/controller.rs

//! Worker process lifecycle: spawn, warm-up, scripted input feeding, and
//! graceful-then-forced termination.

use std::process::Stdio;
use std::time::Duration;

use anyhow::Result;
use tokio::process::{Child, Command};
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use crate::config::model::WorkerSection;
use crate::config::resolve_absolute;
use crate::errors::SpawnError;
use crate::exec::feed;
use crate::notifier::Notifier;

/// How long a worker gets to exit voluntarily before being killed.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Validated launch plan for the worker process.
#[derive(Debug, Clone)]
pub struct WorkerSpec {
    /// Interpreter or executable to launch.
    pub program: String,

    /// Arguments, script path first.
    pub args: Vec<String>,

    /// Ordered stdin lines fed after warm-up.
    pub inputs: Vec<String>,

    /// Whether `inputs` are fed at all.
    pub use_inputs: bool,

    /// Wait after spawn before the first input line.
    pub warmup: Duration,

    /// Pause between consecutive input lines.
    pub input_delay: Duration,
}

impl WorkerSpec {
    /// Build the launch plan from the `[worker]` config section, resolving
    /// the script path to absolute form.
    pub fn from_config(worker: &WorkerSection) -> Self {
        let script = resolve_absolute(&worker.script);
        let mut args = vec![script.to_string_lossy().into_owned()];
        args.extend(worker.args.iter().cloned());

        Self {
            program: worker.runtime.program().to_string(),
            args,
            inputs: worker.inputs.clone(),
            use_inputs: worker.use_inputs,
            warmup: Duration::from_secs(worker.warmup_secs),
            input_delay: Duration::from_millis(worker.input_delay_ms),
        }
    }
}

/// Owner of the single worker process slot.
///
/// At most one child is live at a time. `start` and `stop` take
/// `&mut self`, so a restart can never interleave with an in-progress
/// lifecycle transition.
pub struct ProcessController {
    spec: WorkerSpec,
    notifier: Notifier,
    grace_period: Duration,

    /// The process slot. `None` means no worker is running.
    child: Option<Child>,
}

impl ProcessController {
    pub fn new(spec: WorkerSpec, notifier: Notifier) -> Self {
        Self {
            spec,
            notifier,
            grace_period: DEFAULT_GRACE_PERIOD,
            child: None,
        }
    }

    /// Override the graceful-stop grace period.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Non-blocking liveness probe on the process slot.
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Spawn the worker and feed it the scripted inputs.
    ///
    /// All failures are handled here and reported via log + error
    /// notification: a spawn failure leaves the slot empty and the
    /// supervisor idle (no retry), an input-delivery failure leaves the
    /// worker running as-is. Neither crashes the supervisor.
    pub async fn start(&mut self) {
        if let Err(err) = self.try_start().await {
            error!(error = %err, "failed to start worker");
            self.notifier.worker_error(&format!("{err:#}")).await;
        }
    }

    async fn try_start(&mut self) -> Result<()> {
        info!(
            program = %self.spec.program,
            args = ?self.spec.args,
            "starting worker process"
        );

        let stdin = if self.spec.use_inputs {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut child = Command::new(&self.spec.program)
            .args(&self.spec.args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpawnError {
                program: self.spec.program.clone(),
                source,
            })?;

        info!(pid = child.id(), "worker process running");

        feed::drain_output(&mut child);
        self.child = Some(child);
        self.notifier.worker_started().await;

        // Let the worker initialize before any input arrives.
        sleep(self.spec.warmup).await;

        if self.spec.use_inputs {
            let stdin = self.child.as_mut().and_then(|c| c.stdin.take());
            match stdin {
                Some(stdin) => {
                    if let Err(err) =
                        feed::feed_inputs(stdin, &self.spec.inputs, self.spec.input_delay).await
                    {
                        error!(error = %err, "failed to deliver scripted input to worker");
                        self.notifier.worker_error(&format!("{err:#}")).await;
                    }
                }
                None => warn!("worker stdin not available; skipping scripted inputs"),
            }
        }

        Ok(())
    }

    /// Stop the running worker, escalating to a forced kill after the
    /// grace period.
    ///
    /// Idempotent: a no-op with an informational log when no worker is
    /// running or it has already exited. On return the process slot is
    /// empty.
    pub async fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            info!("no worker process running; nothing to stop");
            return;
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                info!(?status, "worker process had already exited");
                return;
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "liveness probe on worker failed"),
        }

        info!("stopping worker process");
        request_graceful_stop(&mut child);

        match timeout(self.grace_period, child.wait()).await {
            Ok(Ok(status)) => info!(?status, "worker process stopped"),
            Ok(Err(err)) => warn!(error = %err, "waiting for worker to stop failed"),
            Err(_) => {
                warn!(
                    grace_secs = self.grace_period.as_secs(),
                    "worker did not stop within grace period; killing"
                );
                // kill() waits on the child after delivering the signal, so
                // the process is reaped before we return.
                if let Err(err) = child.kill().await {
                    error!(error = %err, "failed to kill worker process");
                }
            }
        }
    }
}

/// Ask the worker to terminate voluntarily. SIGTERM on unix; other
/// platforms have no graceful equivalent, so the kill is immediate there.
fn request_graceful_stop(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        match child.id() {
            Some(pid) => {
                if let Err(err) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                    warn!(error = %err, "failed to send SIGTERM to worker");
                }
            }
            None => warn!("worker has no pid; it has likely already exited"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = child.start_kill() {
            warn!(error = %err, "failed to kill worker process");
        }
    }
}
