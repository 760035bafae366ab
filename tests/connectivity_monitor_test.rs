//! Integration tests for the polling connectivity monitor.
//!
//! These tests run the real polling task with a short interval over a
//! scripted probe.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{RecordingListener, ScriptedProbe};
use netkit::config::MonitorConfig;
use netkit::network::{
    ConnectivityEvent, ConnectivityMonitor, ConnectivitySnapshot, ConnectivityState,
};
use netkit::traits::ProbeError;
use tokio::sync::broadcast;

const FAST_POLL: Duration = Duration::from_millis(10);

fn fast_monitor(probe: &ScriptedProbe) -> ConnectivityMonitor {
    ConnectivityMonitor::new(
        Arc::new(probe.clone()),
        MonitorConfig::default().with_poll_interval(FAST_POLL),
    )
}

/// Wait until the probe has been polled at least `polls` times.
async fn wait_for_polls(probe: &ScriptedProbe, polls: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while probe.poll_count() < polls {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("probe was not polled in time");
}

fn drain(events: &mut broadcast::Receiver<ConnectivityEvent>) -> Vec<ConnectivityEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

#[tokio::test]
async fn test_lost_and_restored_emitted_once_each() {
    let probe = ScriptedProbe::sequence(&[true, true, false, false, true]);
    let monitor = fast_monitor(&probe);
    let listener = Arc::new(RecordingListener::default());
    monitor.add_listener(listener.clone());
    let mut events = monitor.subscribe();

    let handle = monitor.start();
    // Past the end of the script the last state repeats
    wait_for_polls(&probe, 8).await;
    handle.shutdown().await;

    let expected = vec![ConnectivityEvent::Lost, ConnectivityEvent::Restored];
    assert_eq!(drain(&mut events), expected);
    assert_eq!(listener.events(), expected);
    assert_eq!(monitor.state(), ConnectivityState::Online);
}

#[tokio::test]
async fn test_steady_connection_emits_nothing() {
    let probe = ScriptedProbe::sequence(&[true, true, true]);
    let monitor = fast_monitor(&probe);
    let listener = Arc::new(RecordingListener::default());
    monitor.add_listener(listener.clone());
    let mut events = monitor.subscribe();

    let handle = monitor.start();
    wait_for_polls(&probe, 5).await;
    handle.shutdown().await;

    assert!(drain(&mut events).is_empty());
    assert!(listener.events().is_empty());
    assert!(monitor.is_online());
}

#[tokio::test]
async fn test_probe_failure_reads_as_offline() {
    let probe = ScriptedProbe::new();
    probe.push_connected(true);
    probe.push_failure(ProbeError::QueryFailed("radio off".to_string()));
    let monitor = fast_monitor(&probe);
    let mut events = monitor.subscribe();

    let handle = monitor.start();
    wait_for_polls(&probe, 4).await;
    handle.shutdown().await;

    let snapshot = monitor.snapshot();
    assert!(!snapshot.is_connected);
    assert_eq!(snapshot.is_internet_reachable, Some(false));
    assert_eq!(snapshot, ConnectivitySnapshot::fail_safe());
    assert_eq!(drain(&mut events), vec![ConnectivityEvent::Lost]);
}

#[tokio::test]
async fn test_no_notifications_after_handle_dropped() {
    let probe = ScriptedProbe::sequence(&[true]);
    let monitor = fast_monitor(&probe);
    let listener = Arc::new(RecordingListener::default());
    monitor.add_listener(listener.clone());
    let mut events = monitor.subscribe();

    let handle = monitor.start();
    wait_for_polls(&probe, 2).await;
    drop(handle);
    let polls_at_stop = probe.poll_count();

    probe.push_connected(false);
    tokio::time::sleep(FAST_POLL * 10).await;
    monitor.check_now().await;

    assert!(monitor.is_stopped());
    assert_eq!(probe.poll_count(), polls_at_stop);
    assert!(drain(&mut events).is_empty());
    assert!(listener.events().is_empty());
}

#[tokio::test]
async fn test_polls_never_overlap() {
    let probe = ScriptedProbe::sequence(&[true, false, true, false]);
    probe.set_delay(Duration::from_millis(30));
    let monitor = fast_monitor(&probe);

    let handle = monitor.start();
    // Manual checks race the polling loop
    let checks = (0..4).map(|_| monitor.check_now());
    futures::future::join_all(checks).await;
    wait_for_polls(&probe, 8).await;
    handle.shutdown().await;

    assert_eq!(probe.max_concurrent_polls(), 1);
}

#[tokio::test]
async fn test_watch_reflects_transitions() {
    let probe = ScriptedProbe::sequence(&[true, false]);
    let monitor = fast_monitor(&probe);
    let mut status = monitor.watch();

    let handle = monitor.start();
    let offline = tokio::time::timeout(
        Duration::from_secs(5),
        status.wait_for(|s| s.state == ConnectivityState::Offline),
    )
    .await
    .expect("monitor did not report offline")
    .map(|s| *s)
    .unwrap();
    handle.shutdown().await;

    assert!(!offline.snapshot.is_connected);
}
