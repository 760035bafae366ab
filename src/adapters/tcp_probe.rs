//! TCP connect network probe.
//!
//! Treats a successful TCP connection to a well-known endpoint as "online".
//! The transport type is not observable this way and is reported as unknown.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::MonitorConfig;
use crate::network::RawNetworkState;
use crate::traits::{NetworkProbe, ProbeError};

/// Network probe that opens a TCP connection to `endpoint`.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    endpoint: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Create a probe for a `host:port` endpoint.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.probe_endpoint.clone(), config.probe_timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connect(&self) -> Result<Option<TcpStream>, ProbeError> {
        if !self.endpoint.contains(':') {
            return Err(ProbeError::InvalidEndpoint(format!(
                "expected host:port, got '{}'",
                self.endpoint
            )));
        }

        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.endpoint)).await {
            Ok(Ok(stream)) => Ok(Some(stream)),
            Ok(Err(e)) => {
                tracing::debug!(endpoint = %self.endpoint, error = %e, "Probe connect failed");
                Ok(None)
            }
            Err(_) => {
                tracing::debug!(endpoint = %self.endpoint, "Probe connect timed out");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl NetworkProbe for TcpProbe {
    async fn network_state(&self) -> Result<RawNetworkState, ProbeError> {
        Ok(match self.connect().await? {
            Some(_) => RawNetworkState::connected(None),
            None => RawNetworkState {
                is_connected: Some(false),
                is_internet_reachable: Some(false),
                transport: None,
            },
        })
    }

    /// Local address of the interface used to reach the endpoint.
    async fn ip_address(&self) -> Result<String, ProbeError> {
        let stream = self.connect().await?.ok_or(ProbeError::Unavailable)?;
        stream
            .local_addr()
            .map(|addr| addr.ip().to_string())
            .map_err(|e| ProbeError::QueryFailed(e.to_string()))
    }
}
