//! Credential pair and session helpers.
//!
//! Tokens live in the [`CredentialStore`] under [`ACCESS_TOKEN_KEY`] and
//! [`REFRESH_TOKEN_KEY`]. Nothing here caches them: every read goes back to
//! the store, so login/logout flows and the refresh path always agree.

use std::sync::Arc;

use crate::traits::CredentialStore;

/// Store key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Store key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Snapshot of the stored tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialPair {
    /// Short-lived token sent as `Authorization: Bearer <token>`.
    pub access_token: Option<String>,
    /// Longer-lived token exchanged at the refresh endpoint.
    pub refresh_token: Option<String>,
}

impl CredentialPair {
    /// Read both tokens from a store.
    pub fn load(store: &dyn CredentialStore) -> Self {
        Self {
            access_token: store.get_string(ACCESS_TOKEN_KEY),
            refresh_token: store.get_string(REFRESH_TOKEN_KEY),
        }
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// Remove both tokens from a store.
pub fn clear_tokens(store: &dyn CredentialStore) {
    store.remove(ACCESS_TOKEN_KEY);
    store.remove(REFRESH_TOKEN_KEY);
}

/// Login/logout operations over the shared credential store.
///
/// The surrounding application's sign-in flow calls [`Session::set_tokens`]
/// after authenticating and [`Session::logout`] when the user signs out;
/// the API client sees the change on its next request.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Store a freshly issued token pair.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) {
        self.store.set(ACCESS_TOKEN_KEY, access_token);
        self.store.set(REFRESH_TOKEN_KEY, refresh_token);
        tracing::debug!("Session tokens stored");
    }

    /// Forget both tokens.
    pub fn logout(&self) {
        clear_tokens(self.store.as_ref());
        tracing::debug!("Session cleared");
    }

    /// True when an access token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.store.get_string(ACCESS_TOKEN_KEY).is_some()
    }

    pub fn credentials(&self) -> CredentialPair {
        CredentialPair::load(self.store.as_ref())
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
