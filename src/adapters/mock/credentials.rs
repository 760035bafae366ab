//! In-memory credential store for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::auth::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::traits::CredentialStore;

/// In-memory credential store for testing.
///
/// Clones share the same values, so a test can hand one clone to the
/// client and inspect another.
///
/// # Example
///
/// ```ignore
/// use netkit::adapters::mock::InMemoryCredentials;
/// use netkit::traits::CredentialStore;
///
/// let store = InMemoryCredentials::with_tokens("A1", "R1");
/// store.remove("accessToken");
/// assert!(store.get_string("accessToken").is_none());
/// assert_eq!(store.get_string("refreshToken").as_deref(), Some("R1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    values: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
}

impl InMemoryCredentials {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding an access and refresh token.
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let store = Self::new();
        store.set(ACCESS_TOKEN_KEY, access_token);
        store.set(REFRESH_TOKEN_KEY, refresh_token);
        store.reset_write_count();
        store
    }

    /// Copy of every stored value.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values().clone()
    }

    /// Number of `set`/`remove` calls since creation or the last reset.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset_write_count(&self) {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner) = 0;
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn count_write(&self) {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }
}

impl CredentialStore for InMemoryCredentials {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values().insert(key.to_string(), value.to_string());
        self.count_write();
    }

    fn remove(&self, key: &str) {
        self.values().remove(key);
        self.count_write();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_credentials_new_is_empty() {
        let store = InMemoryCredentials::new();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_with_tokens() {
        let store = InMemoryCredentials::with_tokens("A1", "R1");
        assert_eq!(store.get_string(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
        assert_eq!(store.get_string(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_set_replaces_and_remove_deletes() {
        let store = InMemoryCredentials::new();
        store.set("key", "one");
        store.set("key", "two");
        assert_eq!(store.get_string("key").as_deref(), Some("two"));

        store.remove("key");
        store.remove("missing");
        assert!(store.get_string("key").is_none());
        assert_eq!(store.write_count(), 4);
    }

    #[test]
    fn test_clones_share_values() {
        let store = InMemoryCredentials::new();
        let clone = store.clone();
        clone.set("accessToken", "A1");
        assert_eq!(store.get_string("accessToken").as_deref(), Some("A1"));
    }
}
