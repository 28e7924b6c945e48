#![cfg(unix)]

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::sleep;

use watchbot::engine::{Runtime, RuntimeOptions, SupervisorEvent};
use watchbot::exec::{ProcessController, WorkerSpec};
use watchbot::notifier::Notifier;

type TestResult = Result<(), Box<dyn Error>>;

/// A worker that appends a line to `marker` on every start, then idles.
fn logging_spec(marker: &Path) -> WorkerSpec {
    WorkerSpec {
        program: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            format!("echo started >> {}; exec sleep 30", marker.display()),
        ],
        inputs: vec![],
        use_inputs: false,
        warmup: Duration::from_millis(200),
        input_delay: Duration::ZERO,
    }
}

fn line_count(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

fn runtime_under_test(
    marker: &Path,
    options: RuntimeOptions,
) -> (Runtime, mpsc::Sender<SupervisorEvent>) {
    let controller = ProcessController::new(logging_spec(marker), Notifier::disabled())
        .with_grace_period(Duration::from_secs(5));
    let (events_tx, events_rx) = mpsc::channel(16);
    let runtime = Runtime::new(controller, Notifier::disabled(), options, events_rx);
    (runtime, events_tx)
}

#[tokio::test]
async fn restart_trigger_stops_then_starts_the_worker_once() -> TestResult {
    let dir = TempDir::new()?;
    let marker = dir.path().join("runs.txt");

    let (runtime, events_tx) = runtime_under_test(&marker, RuntimeOptions::default());

    let driver = tokio::spawn(async move {
        sleep(Duration::from_millis(400)).await;
        let _ = events_tx.send(SupervisorEvent::RestartRequested).await;
        sleep(Duration::from_millis(1500)).await;
        let _ = events_tx.send(SupervisorEvent::ShutdownRequested).await;
    });

    runtime.run().await?;
    driver.await?;

    assert_eq!(line_count(&marker), 2, "initial start plus exactly one restart");
    Ok(())
}

#[tokio::test]
async fn burst_of_triggers_collapses_into_a_single_restart() -> TestResult {
    let dir = TempDir::new()?;
    let marker = dir.path().join("runs.txt");

    let options = RuntimeOptions {
        restart_delay: Duration::from_millis(300),
    };
    let (runtime, events_tx) = runtime_under_test(&marker, options);

    let driver = tokio::spawn(async move {
        sleep(Duration::from_millis(400)).await;
        for _ in 0..3 {
            let _ = events_tx.send(SupervisorEvent::RestartRequested).await;
        }
        sleep(Duration::from_millis(2000)).await;
        let _ = events_tx.send(SupervisorEvent::ShutdownRequested).await;
    });

    runtime.run().await?;
    driver.await?;

    assert_eq!(
        line_count(&marker),
        2,
        "triggers queued during a cycle must coalesce, not stack"
    );
    Ok(())
}

#[tokio::test]
async fn queued_shutdown_aborts_a_pending_restart() -> TestResult {
    let dir = TempDir::new()?;
    let marker = dir.path().join("runs.txt");

    let options = RuntimeOptions {
        restart_delay: Duration::from_millis(300),
    };
    let (runtime, events_tx) = runtime_under_test(&marker, options);

    let driver = tokio::spawn(async move {
        sleep(Duration::from_millis(400)).await;
        let _ = events_tx.send(SupervisorEvent::RestartRequested).await;
        let _ = events_tx.send(SupervisorEvent::ShutdownRequested).await;
    });

    runtime.run().await?;
    driver.await?;

    assert_eq!(
        line_count(&marker),
        1,
        "a shutdown queued behind a restart wins; no new worker starts"
    );
    Ok(())
}
