//! Typed JSON API client.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::transport::{RequestInterceptor, Transport};
use crate::adapters::ReqwestHttpClient;
use crate::auth::{AuthEvents, AuthInterceptor, RefreshCoordinator, Session};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::traits::{CredentialStore, HttpClient, Method, Response};

/// Authenticated JSON client.
///
/// Every request carries the stored access token. A first 401 triggers a
/// shared token refresh and one replay; see [`AuthInterceptor`].
///
/// # Example
///
/// ```ignore
/// use netkit::adapters::FileCredentialStore;
/// use netkit::api::ApiClient;
/// use netkit::auth::NoopAuthEvents;
/// use netkit::config::ClientConfig;
/// use std::sync::Arc;
///
/// let client = ApiClient::from_config(
///     ClientConfig::from_env()?,
///     Arc::new(FileCredentialStore::open_default()?),
///     Arc::new(NoopAuthEvents),
/// )?;
/// let order: serde_json::Value = client.get("/orders/42").await?;
/// ```
pub struct ApiClient {
    transport: Transport,
    session: Session,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        events: Arc<dyn AuthEvents>,
        config: ClientConfig,
    ) -> Self {
        let refresh = RefreshCoordinator::new(Arc::clone(&http), Arc::clone(&store), events, &config);
        let auth = AuthInterceptor::new(Arc::clone(&store), refresh.clone());
        let transport = Transport::new(http, config).with_interceptor(Arc::new(auth));

        Self {
            transport,
            session: Session::new(store),
            refresh,
        }
    }

    /// Validate `config` and build a client on top of reqwest.
    pub fn from_config(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        events: Arc<dyn AuthEvents>,
    ) -> ApiResult<Self> {
        config.validate()?;
        tracing::debug!(
            api_url = %config.api_url,
            api_version = %config.api_version,
            environment = config.environment.as_str(),
            "Creating API client"
        );
        Ok(Self::new(
            Arc::new(ReqwestHttpClient::new()),
            store,
            events,
            config,
        ))
    }

    /// Append an interceptor after the auth interceptor.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.transport = self.transport.with_interceptor(interceptor);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Send a request and return the 2xx response.
    ///
    /// Non-2xx responses, including a 401 that survived the replay, become
    /// [`ApiError::HttpStatus`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> ApiResult<Response> {
        let request = self.transport.prepare(method, path, body);
        let response = self.transport.dispatch(request).await?;

        if response.is_success() {
            Ok(response)
        } else {
            tracing::debug!(%method, path, status = response.status, "Request failed");
            Err(ApiError::HttpStatus {
                status: response.status,
                body: response.text(),
            })
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(Method::Get, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::Post, path, Some(encode(body)?)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::Put, path, Some(encode(body)?)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::Patch, path, Some(encode(body)?)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(Method::Delete, path, None).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> ApiResult<T> {
        let response = self.request(method, path, body).await?;
        response.json().map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.config().api_url)
            .field("session", &self.session)
            .finish()
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Bytes> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|e| ApiError::Decode {
            message: format!("failed to encode request body: {}", e),
        })
}
