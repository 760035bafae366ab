//! Error category classification.
//!
//! A high-level categorization of errors so callers can pick a recovery
//! strategy without matching on every variant.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (connection, DNS, timeout).
    /// Generally transient and retryable.
    Network,

    /// The credential session is over; the user must sign in again.
    Auth,

    /// Backend/server-side errors (HTTP 5xx).
    /// Generally transient and retryable after delay.
    Server,

    /// The request itself was rejected (HTTP 4xx) or its response could
    /// not be decoded. Not retryable as-is.
    Client,

    /// Configuration errors. Not retryable until configuration is corrected.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again.",
            ErrorCategory::Auth => "Sign in again to continue.",
            ErrorCategory::Server => "Wait a moment and try again.",
            ErrorCategory::Client => "The request could not be completed.",
            ErrorCategory::Configuration => "Check the application configuration.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
