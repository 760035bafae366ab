//! Network connectivity.
//!
//! One-shot queries over a [`NetworkProbe`] plus the polling
//! [`ConnectivityMonitor`]. A failing probe never surfaces an error here:
//! it reads as [`ConnectivitySnapshot::fail_safe`].

pub mod monitor;
pub mod snapshot;
pub mod tracker;

pub use monitor::{ConnectivityListener, ConnectivityMonitor, ConnectivityStatus, MonitorHandle};
pub use snapshot::{
    ConnectivityEvent, ConnectivitySnapshot, ConnectivityState, RawNetworkState, TransportType,
};
pub use tracker::TransitionTracker;

use crate::traits::NetworkProbe;

/// Query the probe once.
pub async fn query_state(probe: &dyn NetworkProbe) -> ConnectivitySnapshot {
    match probe.network_state().await {
        Ok(raw) => ConnectivitySnapshot::from_raw(raw),
        Err(e) => {
            tracing::debug!(error = %e, "Network query failed");
            ConnectivitySnapshot::fail_safe()
        }
    }
}

pub async fn is_online(probe: &dyn NetworkProbe) -> bool {
    query_state(probe).await.is_connected
}

pub async fn is_wifi(probe: &dyn NetworkProbe) -> bool {
    query_state(probe).await.is_wifi()
}

pub async fn is_cellular(probe: &dyn NetworkProbe) -> bool {
    query_state(probe).await.is_cellular()
}

/// The device's IP address, or `None` when the probe cannot tell.
pub async fn ip_address(probe: &dyn NetworkProbe) -> Option<String> {
    probe.ip_address().await.ok()
}
