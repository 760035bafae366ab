//! Credential store trait abstraction.
//!
//! The store is a synchronous string key-value contract. The auth layer
//! consumes it through this trait so tests can substitute an in-memory fake.

/// Credential store errors, raised when opening a backing store.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialsError {
    /// The default storage location could not be determined
    NoHomeDirectory,
    /// Failed to load credentials
    LoadFailed(String),
    /// Failed to save credentials
    SaveFailed(String),
    /// Serialization/deserialization error
    Serialization(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::NoHomeDirectory => {
                write!(f, "Failed to determine home directory")
            }
            CredentialsError::LoadFailed(msg) => write!(f, "Failed to load credentials: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credentials: {}", msg),
            CredentialsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Trait for credential storage.
///
/// Writes are fire-and-forget: implementations backed by fallible media
/// log failures rather than surfacing them, matching the contract of the
/// persisted key-value store the application shares with its login flow.
///
/// # Example
///
/// ```ignore
/// use netkit::traits::CredentialStore;
///
/// fn signed_in(store: &dyn CredentialStore) -> bool {
///     store.get_string("accessToken").is_some()
/// }
/// ```
pub trait CredentialStore: Send + Sync {
    /// Read a string value.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Store a string value, replacing any existing one.
    fn set(&self, key: &str, value: &str);

    /// Remove a value. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_error_display() {
        assert_eq!(
            CredentialsError::NoHomeDirectory.to_string(),
            "Failed to determine home directory"
        );
        assert_eq!(
            CredentialsError::LoadFailed("read error".to_string()).to_string(),
            "Failed to load credentials: read error"
        );
        assert_eq!(
            CredentialsError::SaveFailed("write error".to_string()).to_string(),
            "Failed to save credentials: write error"
        );
        assert_eq!(
            CredentialsError::Serialization("invalid json".to_string()).to_string(),
            "Serialization error: invalid json"
        );
    }

    #[test]
    fn test_credentials_error_implements_error_trait() {
        let err = CredentialsError::NoHomeDirectory;
        let _: &dyn std::error::Error = &err;
    }
}
