//! Single-flight access token refresh.
//!
//! At most one refresh call is in flight per [`RefreshCoordinator`]. Every
//! caller that asks for a refresh while one is running awaits that same
//! operation and observes the same outcome, so a burst of concurrent 401s
//! produces exactly one `POST /auth/refresh` and no two refreshes can race to
//! overwrite each other's tokens.
//!
//! The operation runs on its own task: it settles, persists or clears
//! credentials, and fires `on_auth_expired` exactly once even if the request
//! that started it is dropped. The slot is emptied when the task ends, even
//! if it panics, so a failed operation is never joined again.
//!
//! [`RefreshCoordinator::recover`] is the entry point for a 401: it decides
//! between joining, reusing an already refreshed token and starting a new
//! refresh while holding the slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};

use super::credentials::{clear_tokens, CredentialPair, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use super::events::AuthEvents;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::traits::{CredentialStore, Headers, HttpClient, HttpError, Method, Request};

/// Body of `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Successful response from `POST /auth/refresh`.
///
/// `refreshToken` is only present when the server rotates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
}

/// Why a refresh call failed.
#[derive(Debug, Clone, PartialEq)]
enum RefreshFailure {
    Transport(HttpError),
    Rejected { status: u16 },
    InvalidPayload(String),
}

impl RefreshFailure {
    fn into_api_error(self) -> ApiError {
        match self {
            RefreshFailure::Transport(err) => err.into(),
            RefreshFailure::Rejected { status } => ApiError::AuthExpired {
                reason: format!("refresh rejected with HTTP {}", status),
            },
            RefreshFailure::InvalidPayload(message) => ApiError::AuthExpired {
                reason: format!("invalid refresh response: {}", message),
            },
        }
    }
}

type RefreshFuture = Shared<BoxFuture<'static, ApiResult<String>>>;

struct InFlight {
    id: u64,
    future: RefreshFuture,
}

/// Outcome of the in-flight slot check made for a 401.
enum Recovery {
    Await(RefreshFuture),
    Current(String),
    NoRefreshToken,
}

struct Inner {
    http: Arc<dyn HttpClient>,
    store: Arc<dyn CredentialStore>,
    events: Arc<dyn AuthEvents>,
    refresh_url: String,
    timeout: Duration,
    default_headers: Headers,
    in_flight: Mutex<Option<InFlight>>,
    next_id: AtomicU64,
}

/// Empties the in-flight slot when a refresh task ends, whether it
/// returns, panics or is aborted.
struct SlotGuard<'a> {
    inner: &'a Inner,
    id: u64,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|in_flight| in_flight.id == self.id) {
            *slot = None;
        }
    }
}

/// Coordinates token refreshes so at most one is in flight.
///
/// Cloning is cheap; clones share the in-flight slot.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl RefreshCoordinator {
    pub fn new(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        events: Arc<dyn AuthEvents>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                store,
                events,
                refresh_url: config.refresh_url(),
                timeout: config.timeout,
                default_headers: config.default_headers.clone(),
                in_flight: Mutex::new(None),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Obtain a new access token, joining the in-flight refresh if there is
    /// one.
    ///
    /// On success the new access token (and rotated refresh token, if any)
    /// has been written to the store before this returns. On failure both
    /// tokens have been cleared and `on_auth_expired` has fired once for the
    /// whole operation.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn refresh(&self, refresh_token: String) -> ApiResult<String> {
        let future = {
            let mut slot = self.lock_slot();
            if let Some(in_flight) = slot.as_ref() {
                tracing::debug!(refresh_id = in_flight.id, "Joining in-flight token refresh");
                in_flight.future.clone()
            } else {
                self.start(&mut slot, refresh_token)
            }
        };
        future.await
    }

    /// Get a usable access token for a request that was sent with
    /// `sent_token` and answered 401.
    ///
    /// - A refresh in flight is joined.
    /// - A stored access token other than `sent_token` is returned as is;
    ///   a refresh already replaced the token the request carried.
    /// - Otherwise a refresh starts with the stored refresh token.
    /// - Without a refresh token the session expires: both tokens are
    ///   cleared, `on_auth_expired` fires and `AuthExpired` is returned.
    ///
    /// The store is read while the in-flight slot is held. A refresh task
    /// writes the store before it empties the slot, so a 401 can never start
    /// a second refresh for a token that has already been replaced.
    pub async fn recover(&self, sent_token: Option<&str>) -> ApiResult<String> {
        let recovery = {
            let mut slot = self.lock_slot();
            if let Some(in_flight) = slot.as_ref() {
                tracing::debug!(refresh_id = in_flight.id, "Joining in-flight token refresh");
                Recovery::Await(in_flight.future.clone())
            } else {
                let credentials = CredentialPair::load(self.inner.store.as_ref());
                match (credentials.access_token, credentials.refresh_token) {
                    (Some(stored), _) if sent_token != Some(stored.as_str()) => {
                        Recovery::Current(stored)
                    }
                    (_, Some(refresh_token)) => {
                        Recovery::Await(self.start(&mut slot, refresh_token))
                    }
                    (_, None) => Recovery::NoRefreshToken,
                }
            }
        };

        match recovery {
            Recovery::Await(future) => future.await,
            Recovery::Current(token) => {
                tracing::debug!("Access token already replaced; skipping refresh");
                Ok(token)
            }
            Recovery::NoRefreshToken => Err(self.expire("no refresh token stored")),
        }
    }

    /// True while a refresh has started and not yet settled.
    pub fn is_in_flight(&self) -> bool {
        self.lock_slot().is_some()
    }

    /// Number of refresh operations started so far.
    pub fn refresh_count(&self) -> u64 {
        self.inner.next_id.load(Ordering::Relaxed)
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn a refresh and put it in the slot. The caller holds the slot.
    fn start(&self, slot: &mut Option<InFlight>, refresh_token: String) -> RefreshFuture {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(refresh_id = id, "Starting token refresh");

        let handle = tokio::spawn(Arc::clone(&self.inner).run(id, refresh_token));
        let future = async move {
            handle.await.unwrap_or_else(|e| {
                Err(ApiError::AuthExpired {
                    reason: format!("refresh task failed: {}", e),
                })
            })
        }
        .boxed()
        .shared();

        *slot = Some(InFlight {
            id,
            future: future.clone(),
        });
        future
    }

    fn expire(&self, reason: &str) -> ApiError {
        tracing::warn!(reason, "Session expired; clearing tokens");
        clear_tokens(self.inner.store.as_ref());
        self.inner.events.on_auth_expired();
        ApiError::AuthExpired {
            reason: reason.to_string(),
        }
    }
}

impl Inner {
    async fn run(self: Arc<Self>, id: u64, refresh_token: String) -> ApiResult<String> {
        let _slot = SlotGuard { inner: &*self, id };

        match self.request_tokens(&refresh_token).await {
            Ok(tokens) => {
                self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token);
                if let Some(rotated) = tokens.refresh_token.as_deref() {
                    self.store.set(REFRESH_TOKEN_KEY, rotated);
                }
                tracing::info!(
                    refresh_id = id,
                    rotated = tokens.refresh_token.is_some(),
                    "Access token refreshed"
                );
                Ok(tokens.access_token)
            }
            Err(failure) => {
                tracing::warn!(refresh_id = id, ?failure, "Token refresh failed; clearing session");
                clear_tokens(self.store.as_ref());
                self.events.on_auth_expired();
                Err(failure.into_api_error())
            }
        }
    }

    async fn request_tokens(&self, refresh_token: &str) -> Result<TokenResponse, RefreshFailure> {
        let body = serde_json::to_vec(&RefreshRequest {
            refresh_token: refresh_token.to_string(),
        })
        .map_err(|e| RefreshFailure::InvalidPayload(e.to_string()))?;

        let mut request = Request::new(Method::Post, &self.refresh_url)
            .with_body(body)
            .with_timeout(self.timeout);
        for (name, value) in &self.default_headers {
            request.set_header(name, value.clone());
        }
        request.set_header("Content-Type", "application/json");

        let response = self
            .http
            .send(request)
            .await
            .map_err(RefreshFailure::Transport)?;

        if !response.is_success() {
            return Err(RefreshFailure::Rejected {
                status: response.status,
            });
        }

        let tokens: TokenResponse = response
            .json()
            .map_err(|e| RefreshFailure::InvalidPayload(e.to_string()))?;
        if tokens.access_token.is_empty() {
            return Err(RefreshFailure::InvalidPayload(
                "empty access token".to_string(),
            ));
        }
        Ok(tokens)
    }
}
