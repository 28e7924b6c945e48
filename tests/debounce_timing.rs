use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::advance;

use watchbot::engine::{spawn_debouncer, SupervisorEvent};

/// Give the debounce task a chance to consume pending pokes before the
/// paused clock moves.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn burst_coalesces_into_one_restart_timed_from_last_event() {
    let (events_tx, mut events_rx) = mpsc::channel(8);
    let handle = spawn_debouncer(Duration::from_secs(15), events_tx);

    // Five qualifying events over three seconds.
    for _ in 0..5 {
        handle.notify().await.expect("debouncer alive");
        settle().await;
        advance(Duration::from_millis(600)).await;
    }
    settle().await;
    assert!(
        events_rx.try_recv().is_err(),
        "no restart may fire while events keep arriving"
    );

    // 14s after the last event: still inside the window.
    advance(Duration::from_secs(14)).await;
    settle().await;
    assert!(events_rx.try_recv().is_err());

    // Past the window: exactly one restart, timed from the last event.
    advance(Duration::from_secs(2)).await;
    settle().await;
    assert!(matches!(
        events_rx.try_recv(),
        Ok(SupervisorEvent::RestartRequested)
    ));

    // Nothing further without new events.
    advance(Duration::from_secs(60)).await;
    settle().await;
    assert!(events_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn rearming_replaces_the_deadline_instead_of_stacking() {
    let (events_tx, mut events_rx) = mpsc::channel(8);
    let handle = spawn_debouncer(Duration::from_secs(10), events_tx);

    handle.notify().await.expect("debouncer alive");
    settle().await;
    advance(Duration::from_secs(6)).await;
    settle().await;

    handle.notify().await.expect("debouncer alive");
    settle().await;

    // The first deadline (t=10s) must not fire; only the replacement at
    // t=16s does.
    advance(Duration::from_secs(5)).await;
    settle().await;
    assert!(events_rx.try_recv().is_err());

    advance(Duration::from_secs(6)).await;
    settle().await;
    assert!(matches!(
        events_rx.try_recv(),
        Ok(SupervisorEvent::RestartRequested)
    ));
    assert!(events_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn separate_bursts_produce_separate_restarts() {
    let (events_tx, mut events_rx) = mpsc::channel(8);
    let handle = spawn_debouncer(Duration::from_secs(5), events_tx);

    handle.notify().await.expect("debouncer alive");
    settle().await;
    advance(Duration::from_secs(6)).await;
    settle().await;
    assert!(matches!(
        events_rx.try_recv(),
        Ok(SupervisorEvent::RestartRequested)
    ));

    handle.notify().await.expect("debouncer alive");
    settle().await;
    advance(Duration::from_secs(6)).await;
    settle().await;
    assert!(matches!(
        events_rx.try_recv(),
        Ok(SupervisorEvent::RestartRequested)
    ));
    assert!(events_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn zero_window_requests_restart_immediately_per_event() {
    let (events_tx, mut events_rx) = mpsc::channel(8);
    let handle = spawn_debouncer(Duration::ZERO, events_tx);

    handle.notify().await.expect("debouncer alive");
    settle().await;
    assert!(matches!(
        events_rx.try_recv(),
        Ok(SupervisorEvent::RestartRequested)
    ));

    handle.notify().await.expect("debouncer alive");
    settle().await;
    assert!(matches!(
        events_rx.try_recv(),
        Ok(SupervisorEvent::RestartRequested)
    ));
    assert!(events_rx.try_recv().is_err());
}
