//! Error handling for the API client.
//!
//! | Variant | Meaning | Retryable |
//! |---------|---------|-----------|
//! | `Transport` | Connection, DNS, timeout, TLS | Yes (mostly) |
//! | `AuthExpired` | Refresh token missing or refresh failed | No, sign in again |
//! | `HttpStatus` | Non-2xx response passed through | 5xx, 408, 429 |
//! | `Decode` | 2xx body did not match the expected type | No |
//! | `Config` | Invalid client configuration | No |
//!
//! The auth interceptor recovers exactly one failure locally (a first 401)
//! and passes every other failure through unmodified.

mod category;
mod network;

pub use category::ErrorCategory;
pub use network::NetworkError;

use thiserror::Error;

use crate::traits::HttpError;

/// Errors returned by [`crate::api::ApiClient`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request (or the refresh call) never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] NetworkError),

    /// The credential session is over and both tokens have been cleared.
    #[error("session expired: {reason}")]
    AuthExpired { reason: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A 2xx body could not be decoded into the requested type.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// The client configuration is invalid.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

/// Type alias for Results using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        ApiError::Transport(err.into())
    }
}

impl ApiError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Transport(_) => ErrorCategory::Network,
            ApiError::AuthExpired { .. } => ErrorCategory::Auth,
            ApiError::HttpStatus { status, .. } if *status >= 500 => ErrorCategory::Server,
            ApiError::HttpStatus { .. } | ApiError::Decode { .. } => ErrorCategory::Client,
            ApiError::Config { .. } => ErrorCategory::Configuration,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(err) => err.is_retryable(),
            ApiError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            _ => false,
        }
    }

    /// Check if the user has to sign in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ApiError::AuthExpired { .. })
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(err) => err.user_message(),
            ApiError::AuthExpired { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                401 => "Authentication required. Please sign in again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            ApiError::Decode { .. } => {
                "Received an invalid response from the server.".to_string()
            }
            ApiError::Config { message } => format!("Configuration error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Transport(err) => err.error_code(),
            ApiError::AuthExpired { .. } => "E_AUTH_EXPIRED",
            ApiError::HttpStatus { .. } => "E_HTTP_STATUS",
            ApiError::Decode { .. } => "E_DECODE",
            ApiError::Config { .. } => "E_CONFIG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_converts_to_transport() {
        let err: ApiError = HttpError::ConnectionFailed("refused".to_string()).into();
        assert!(matches!(
            err,
            ApiError::Transport(NetworkError::ConnectionFailed { .. })
        ));
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_auth_expired_requires_reauth() {
        let err = ApiError::AuthExpired {
            reason: "no refresh token stored".to_string(),
        };
        assert!(err.requires_reauth());
        assert!(!err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert_eq!(err.error_code(), "E_AUTH_EXPIRED");
    }

    #[test]
    fn test_http_status_categories() {
        let server = ApiError::HttpStatus {
            status: 503,
            body: String::new(),
        };
        let client = ApiError::HttpStatus {
            status: 404,
            body: "{\"message\":\"Not found\"}".to_string(),
        };

        assert_eq!(server.category(), ErrorCategory::Server);
        assert!(server.is_retryable());
        assert_eq!(client.category(), ErrorCategory::Client);
        assert!(!client.is_retryable());
        assert_eq!(client.status(), Some(404));
        assert!(client.to_string().contains("Not found"));
    }

    #[test]
    fn test_status_401_is_not_reauth_by_itself() {
        // A 401 that survived the refresh-and-retry is a plain status error.
        let err = ApiError::HttpStatus {
            status: 401,
            body: String::new(),
        };
        assert!(!err.requires_reauth());
        assert!(err.user_message().contains("sign in"));
    }

    #[test]
    fn test_user_messages_not_empty() {
        let errors = vec![
            ApiError::Transport(NetworkError::Timeout {
                message: "30s".to_string(),
            }),
            ApiError::AuthExpired {
                reason: "refresh rejected".to_string(),
            },
            ApiError::HttpStatus {
                status: 418,
                body: String::new(),
            },
            ApiError::Decode {
                message: "missing field".to_string(),
            },
            ApiError::Config {
                message: "bad url".to_string(),
            },
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "{:?}", err);
            assert!(!err.error_code().is_empty(), "{:?}", err);
        }
    }
}
