//! Connectivity polling.
//!
//! [`ConnectivityMonitor`] polls a [`NetworkProbe`] on an interval and
//! publishes the result three ways:
//! - the current [`ConnectivityStatus`] through a `watch` channel
//! - each [`ConnectivityEvent`] through a `broadcast` channel
//! - [`ConnectivityListener`] callbacks, when `notify_transitions` is set
//!
//! The first poll runs immediately and only sets the state. Polls never
//! overlap: the loop and [`ConnectivityMonitor::check_now`] share one poll
//! lock, and interval ticks missed while a poll is outstanding are skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::query_state;
use super::snapshot::{ConnectivityEvent, ConnectivitySnapshot, ConnectivityState};
use super::tracker::TransitionTracker;
use crate::config::MonitorConfig;
use crate::traits::NetworkProbe;

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Receives connectivity transitions.
///
/// Callbacks run on the polling task; keep them short.
pub trait ConnectivityListener: Send + Sync {
    fn on_connectivity_lost(&self) {}
    fn on_connectivity_restored(&self) {}
}

/// Current monitor state and the snapshot it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityStatus {
    pub state: ConnectivityState,
    pub snapshot: ConnectivitySnapshot,
}

struct Inner {
    probe: Arc<dyn NetworkProbe>,
    config: MonitorConfig,
    /// Poll lock. Held for the whole of one poll.
    tracker: tokio::sync::Mutex<TransitionTracker>,
    status_tx: watch::Sender<ConnectivityStatus>,
    events_tx: broadcast::Sender<ConnectivityEvent>,
    listeners: Mutex<Vec<Arc<dyn ConnectivityListener>>>,
    stopped: AtomicBool,
}

/// Polls network state and reports transitions.
///
/// Cloning is cheap; clones share state.
///
/// # Example
///
/// ```ignore
/// use netkit::adapters::TcpProbe;
/// use netkit::config::MonitorConfig;
/// use netkit::network::ConnectivityMonitor;
/// use std::sync::Arc;
///
/// let config = MonitorConfig::default();
/// let monitor = ConnectivityMonitor::new(Arc::new(TcpProbe::from_config(&config)), config);
/// let mut events = monitor.subscribe();
/// let handle = monitor.start();
///
/// while let Ok(event) = events.recv().await {
///     println!("{}", event);
/// }
/// handle.stop();
/// ```
#[derive(Clone)]
pub struct ConnectivityMonitor {
    inner: Arc<Inner>,
}

impl ConnectivityMonitor {
    pub fn new(probe: Arc<dyn NetworkProbe>, config: MonitorConfig) -> Self {
        let (status_tx, _) = watch::channel(ConnectivityStatus {
            state: ConnectivityState::Unknown,
            snapshot: ConnectivitySnapshot::initial(config.assume_connected_initially),
        });
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                probe,
                config,
                tracker: tokio::sync::Mutex::new(TransitionTracker::new()),
                status_tx,
                events_tx,
                listeners: Mutex::new(Vec::new()),
                stopped: AtomicBool::new(false),
            }),
        }
    }

    /// Spawn the polling task. The first poll runs immediately.
    ///
    /// Polling stops when the returned handle is stopped or dropped.
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> MonitorHandle {
        let monitor = self.clone();
        let period = self.inner.config.poll_interval;

        let task = tokio::spawn(async move {
            tracing::info!("Connectivity monitor started (interval: {:?})", period);

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if monitor.is_stopped() {
                    break;
                }
                monitor.poll().await;
            }

            tracing::debug!("Connectivity monitor stopped");
        });

        MonitorHandle {
            monitor: self.clone(),
            task: Some(task),
        }
    }

    /// Run one poll now, through the same non-overlapping path as the
    /// polling loop. Waits for an outstanding poll to finish first.
    pub async fn check_now(&self) -> ConnectivitySnapshot {
        self.poll().await
    }

    /// Query the probe without touching monitor state or emitting events.
    pub async fn query_connectivity(&self) -> ConnectivitySnapshot {
        query_state(self.inner.probe.as_ref()).await
    }

    /// The snapshot from the last completed poll, or the initial snapshot.
    pub fn snapshot(&self) -> ConnectivitySnapshot {
        self.inner.status_tx.borrow().snapshot
    }

    pub fn state(&self) -> ConnectivityState {
        self.inner.status_tx.borrow().state
    }

    pub fn is_online(&self) -> bool {
        self.snapshot().is_connected
    }

    /// Watch the status as polls complete.
    pub fn watch(&self) -> watch::Receiver<ConnectivityStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Receive every transition from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent> {
        self.inner.events_tx.subscribe()
    }

    pub fn add_listener(&self, listener: Arc<dyn ConnectivityListener>) {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Stop polling for good. No notifications are delivered afterwards.
    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    async fn poll(&self) -> ConnectivitySnapshot {
        let mut tracker = self.inner.tracker.lock().await;
        if self.is_stopped() {
            return self.snapshot();
        }

        let snapshot = match self.inner.probe.network_state().await {
            Ok(raw) => ConnectivitySnapshot::from_raw(raw),
            Err(e) => {
                tracing::warn!(error = %e, "Network probe failed; reporting offline");
                ConnectivitySnapshot::fail_safe()
            }
        };

        // Stopped while the probe was running
        if self.is_stopped() {
            return snapshot;
        }

        let event = tracker.observe(snapshot.is_connected);
        self.inner.status_tx.send_replace(ConnectivityStatus {
            state: tracker.state(),
            snapshot,
        });
        tracing::trace!(?snapshot, "Connectivity polled");

        if let Some(event) = event {
            self.emit(event);
        }
        snapshot
    }

    fn emit(&self, event: ConnectivityEvent) {
        match event {
            ConnectivityEvent::Lost => tracing::info!("Connectivity lost"),
            ConnectivityEvent::Restored => tracing::info!("Connectivity restored"),
        }

        if self.inner.config.notify_transitions {
            let listeners = self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            for listener in listeners {
                match event {
                    ConnectivityEvent::Lost => listener.on_connectivity_lost(),
                    ConnectivityEvent::Restored => listener.on_connectivity_restored(),
                }
            }
        }

        // No receivers is fine
        let _ = self.inner.events_tx.send(event);
    }
}

/// Owns the polling task. Stopping or dropping it tears the monitor down.
pub struct MonitorHandle {
    monitor: ConnectivityMonitor,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Stop polling and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.monitor.stop();
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }

    /// Stop polling without waiting.
    pub fn stop(mut self) {
        self.teardown();
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    fn teardown(&mut self) {
        self.monitor.stop();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
