//! Client and monitor configuration.
//!
//! Use the builder methods to customize behavior, or [`ClientConfig::from_env`]
//! to read the `NETKIT_*` environment variables.
//!
//! # Example
//!
//! ```ignore
//! use netkit::config::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::default()
//!     .with_api_url("https://api.example.com")
//!     .with_timeout(Duration::from_secs(10));
//! config.validate()?;
//! ```

use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use crate::error::{ApiError, ApiResult};
use crate::traits::Headers;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.example.com";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Path of the token refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Default connectivity polling interval (3 seconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;

/// Default endpoint the TCP probe connects to.
pub const DEFAULT_PROBE_ENDPOINT: &str = "1.1.1.1:443";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }

    pub fn is_staging(&self) -> bool {
        *self == Environment::Staging
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(ApiError::Config {
                message: format!(
                    "unknown environment '{}' (expected development, staging or production)",
                    other
                ),
            }),
        }
    }
}

/// Configuration for the API client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every relative request path is joined onto
    pub api_url: String,
    /// API version label (default: v1). Informational: logged when a
    /// client is built, never added to request paths or headers.
    pub api_version: String,
    /// Deployment environment
    pub environment: Environment,
    /// Per-request timeout (default: 30s)
    pub timeout: Duration,
    /// Headers sent with every request
    pub default_headers: Headers,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = Headers::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: "v1".to_string(),
            environment: Environment::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            default_headers,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL. A trailing slash is dropped.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Full URL of the token refresh endpoint.
    pub fn refresh_url(&self) -> String {
        format!("{}{}", self.api_url, REFRESH_PATH)
    }

    /// Check that the base URL is an absolute http(s) URL and the timeout
    /// is non-zero.
    pub fn validate(&self) -> ApiResult<()> {
        let url = Url::parse(&self.api_url).map_err(|e| ApiError::Config {
            message: format!("invalid API URL '{}': {}", self.api_url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::Config {
                message: format!("API URL must use http or https, got '{}'", url.scheme()),
            });
        }
        if self.timeout.is_zero() {
            return Err(ApiError::Config {
                message: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Read configuration from `NETKIT_*` environment variables and
    /// validate it.
    ///
    /// - `NETKIT_API_URL` (default `https://api.example.com`)
    /// - `NETKIT_API_VERSION` (default `v1`)
    /// - `NETKIT_ENVIRONMENT` (`development`, `staging`, `production`)
    /// - `NETKIT_TIMEOUT_MS` (default 30000)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("NETKIT_API_URL") {
            config = config.with_api_url(url);
        }
        if let Some(version) = lookup("NETKIT_API_VERSION") {
            config = config.with_api_version(version);
        }
        if let Some(environment) = lookup("NETKIT_ENVIRONMENT") {
            config = config.with_environment(environment.parse()?);
        }
        if let Some(ms) = lookup("NETKIT_TIMEOUT_MS") {
            config = config.with_timeout(Duration::from_millis(parse_millis(
                "NETKIT_TIMEOUT_MS",
                &ms,
            )?));
        }

        config.validate()?;
        Ok(config)
    }
}

/// Configuration for the connectivity monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Interval between polls (default: 3s)
    pub poll_interval: Duration,
    /// Report "connected" before the first poll completes (default: true)
    pub assume_connected_initially: bool,
    /// Deliver lost/restored notifications (default: true)
    pub notify_transitions: bool,
    /// `host:port` the TCP probe connects to
    pub probe_endpoint: String,
    /// Connect timeout for the TCP probe
    pub probe_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            assume_connected_initially: true,
            notify_transitions: true,
            probe_endpoint: DEFAULT_PROBE_ENDPOINT.to_string(),
            probe_timeout: Duration::from_secs(2),
        }
    }
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_assume_connected_initially(mut self, assume: bool) -> Self {
        self.assume_connected_initially = assume;
        self
    }

    pub fn with_notify_transitions(mut self, notify: bool) -> Self {
        self.notify_transitions = notify;
        self
    }

    pub fn with_probe_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.probe_endpoint = endpoint.into();
        self
    }

    /// Read `NETKIT_POLL_INTERVAL_MS` and `NETKIT_PROBE_ENDPOINT`.
    pub fn from_env() -> ApiResult<Self> {
        let mut config = Self::default();
        if let Ok(ms) = std::env::var("NETKIT_POLL_INTERVAL_MS") {
            let ms = parse_millis("NETKIT_POLL_INTERVAL_MS", &ms)?;
            if ms == 0 {
                return Err(ApiError::Config {
                    message: "NETKIT_POLL_INTERVAL_MS must be greater than zero".to_string(),
                });
            }
            config = config.with_poll_interval(Duration::from_millis(ms));
        }
        if let Ok(endpoint) = std::env::var("NETKIT_PROBE_ENDPOINT") {
            config = config.with_probe_endpoint(endpoint);
        }
        Ok(config)
    }
}

fn parse_millis(key: &str, value: &str) -> ApiResult<u64> {
    value.trim().parse().map_err(|_| ApiError::Config {
        message: format!("{} must be a whole number of milliseconds, got '{}'", key, value),
    })
}
