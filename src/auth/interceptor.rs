//! Bearer token interceptor with refresh-and-retry on 401.

use std::sync::Arc;

use async_trait::async_trait;

use super::credentials::ACCESS_TOKEN_KEY;
use super::refresh::RefreshCoordinator;
use crate::api::{Attempt, PendingRequest, RequestInterceptor, ResponseAction};
use crate::error::ApiResult;
use crate::traits::{CredentialStore, Request, Response};

/// Format an `Authorization` header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Attaches the stored access token to every request and recovers from a
/// first 401 by refreshing the token and replaying the request once.
pub struct AuthInterceptor {
    store: Arc<dyn CredentialStore>,
    refresh: RefreshCoordinator,
}

impl AuthInterceptor {
    pub fn new(store: Arc<dyn CredentialStore>, refresh: RefreshCoordinator) -> Self {
        Self { store, refresh }
    }

    /// Set `Authorization: Bearer <token>` when an access token is stored.
    /// Without one the request goes out unauthenticated.
    pub fn attach_token(&self, request: &mut Request) {
        if let Some(token) = self.store.get_string(ACCESS_TOKEN_KEY) {
            request.set_header("Authorization", bearer(&token));
        }
    }

    pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.refresh
    }
}

#[async_trait]
impl RequestInterceptor for AuthInterceptor {
    fn on_request(&self, request: &mut Request) {
        self.attach_token(request);
    }

    async fn on_response(
        &self,
        pending: &PendingRequest,
        attempt: Attempt,
        response: Response,
    ) -> ApiResult<ResponseAction> {
        if !response.is_unauthorized() || attempt.is_retried() {
            return Ok(ResponseAction::Complete(response));
        }

        tracing::debug!(url = %pending.request().url, "Got 401; recovering access token");
        let token = self.refresh.recover(pending.sent_token()).await?;
        Ok(ResponseAction::Replay(pending.replay_with(&token)))
    }
}
