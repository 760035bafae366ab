//! Common test utilities for integration tests.
//!
//! This module provides fixtures for driving an [`ApiClient`] against a
//! wiremock server and for observing auth and connectivity callbacks.
//!
//! # Example
//!
//! ```ignore
//! mod common;
//! use common::TestClient;
//!
//! let server = wiremock::MockServer::start().await;
//! let t = TestClient::with_tokens(&server, "A1", "R1");
//! let order: serde_json::Value = t.client.get("/orders/42").await?;
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;

use netkit::adapters::ReqwestHttpClient;
use netkit::api::ApiClient;
use netkit::config::ClientConfig;
use wiremock::MockServer;

/// An API client wired to a mock server, an in-memory store and a
/// counting auth callback.
pub struct TestClient {
    pub client: ApiClient,
    pub store: InMemoryCredentials,
    pub events: Arc<CountingAuthEvents>,
}

impl TestClient {
    /// Client with an empty credential store.
    pub fn new(server: &MockServer) -> Self {
        Self::with_store(server, InMemoryCredentials::new())
    }

    /// Client whose store holds `access` / `refresh`.
    pub fn with_tokens(server: &MockServer, access: &str, refresh: &str) -> Self {
        Self::with_store(server, InMemoryCredentials::with_tokens(access, refresh))
    }

    pub fn with_store(server: &MockServer, store: InMemoryCredentials) -> Self {
        let events = Arc::new(CountingAuthEvents::default());
        let client = ApiClient::new(
            Arc::new(ReqwestHttpClient::new()),
            Arc::new(store.clone()),
            events.clone(),
            test_config(server),
        );
        Self {
            client,
            store,
            events,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get_string(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get_string(REFRESH_TOKEN_KEY)
    }
}

/// Client configuration pointing at the mock server.
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new().with_api_url(server.uri())
}

/// Values of the `Authorization` header of every request the server got
/// for `path`, in arrival order. Requests without the header yield `None`.
pub async fn authorization_headers(server: &MockServer, path: &str) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == path)
        .map(|request| {
            request
                .headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .collect()
}
