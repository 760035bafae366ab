//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `netkit::adapters::mock` and provides callback recorders.

pub use netkit::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse, ScriptedProbe};
pub use netkit::auth::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use netkit::traits::CredentialStore;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use netkit::auth::AuthEvents;
use netkit::network::{ConnectivityEvent, ConnectivityListener};

/// Counts `on_auth_expired` calls.
#[derive(Debug, Default)]
pub struct CountingAuthEvents {
    expired: AtomicUsize,
}

impl CountingAuthEvents {
    pub fn expired_count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

impl AuthEvents for CountingAuthEvents {
    fn on_auth_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records connectivity callbacks in order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ConnectivityEvent>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<ConnectivityEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ConnectivityListener for RecordingListener {
    fn on_connectivity_lost(&self) {
        self.events.lock().unwrap().push(ConnectivityEvent::Lost);
    }

    fn on_connectivity_restored(&self) {
        self.events.lock().unwrap().push(ConnectivityEvent::Restored);
    }
}
