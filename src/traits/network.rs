//! Network probe trait abstraction.
//!
//! A probe answers "what does the device's network look like right now".
//! The connectivity monitor polls it; tests feed it a scripted sequence.

use async_trait::async_trait;

use crate::network::RawNetworkState;

/// Probe errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// The platform query itself failed
    QueryFailed(String),
    /// The probe is misconfigured
    InvalidEndpoint(String),
    /// No address is available
    Unavailable,
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::QueryFailed(msg) => write!(f, "Network query failed: {}", msg),
            ProbeError::InvalidEndpoint(msg) => write!(f, "Invalid probe endpoint: {}", msg),
            ProbeError::Unavailable => write!(f, "Network information unavailable"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Trait for querying device network state.
#[async_trait]
pub trait NetworkProbe: Send + Sync {
    /// Query the current network state.
    ///
    /// Fields the platform cannot determine are `None`.
    async fn network_state(&self) -> Result<RawNetworkState, ProbeError>;

    /// Query the device's IP address on the active interface.
    async fn ip_address(&self) -> Result<String, ProbeError>;
}
