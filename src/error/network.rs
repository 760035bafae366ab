//! Network-related error types.
//!
//! This module defines errors that occur below HTTP semantics: connection,
//! DNS, timeout and TLS failures on any request, including the refresh call.

use std::fmt;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { message: String },

    /// DNS resolution failed.
    DnsResolutionFailed { message: String },

    /// Request timed out.
    Timeout { message: String },

    /// TLS/SSL error.
    TlsError { message: String },

    /// The request URL could not be built or parsed.
    InvalidUrl { message: String },

    /// Generic network error.
    Other { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::DnsResolutionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::TlsError { .. } => false, // Usually config issue
            NetworkError::InvalidUrl { .. } => false,
            NetworkError::Other { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            NetworkError::DnsResolutionFailed { .. } => {
                "Could not resolve the server address. Please check your internet connection."
                    .to_string()
            }
            NetworkError::Timeout { .. } => {
                "The request timed out. The server may be slow or unreachable.".to_string()
            }
            NetworkError::TlsError { .. } => {
                "A secure connection could not be established.".to_string()
            }
            NetworkError::InvalidUrl { .. } => "The request address is invalid.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::DnsResolutionFailed { .. } => "E_NET_DNS",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::TlsError { .. } => "E_NET_TLS",
            NetworkError::InvalidUrl { .. } => "E_NET_URL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { message } => {
                write!(f, "Connection failed: {}", message)
            }
            NetworkError::DnsResolutionFailed { message } => {
                write!(f, "DNS resolution failed: {}", message)
            }
            NetworkError::Timeout { message } => write!(f, "Request timed out: {}", message),
            NetworkError::TlsError { message } => write!(f, "TLS error: {}", message),
            NetworkError::InvalidUrl { message } => write!(f, "Invalid URL: {}", message),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<HttpError> for NetworkError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed { message },
            HttpError::Dns(message) => NetworkError::DnsResolutionFailed { message },
            HttpError::Timeout(message) => NetworkError::Timeout { message },
            HttpError::Tls(message) => NetworkError::TlsError { message },
            HttpError::InvalidUrl(message) => NetworkError::InvalidUrl { message },
            HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other { message },
        }
    }
}
