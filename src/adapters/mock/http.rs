//! Mock HTTP client for testing.
//!
//! Provides a scriptable mock HTTP client that returns predefined responses
//! or errors per method and URL, and records every request it receives.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::traits::{find_header, Headers, HttpClient, HttpError, Method, Request, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Bytes>,
}

impl RecordedRequest {
    /// Get a header value, ignoring ASCII case in the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Parse the body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

impl From<&Request> for RecordedRequest {
    fn from(request: &Request) -> Self {
        Self {
            method: request.method,
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        }
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// A response with the given status and an empty body.
    pub fn status(status: u16) -> Self {
        MockResponse::Success(Response::new(status, Bytes::new()))
    }

    /// A response with a JSON body.
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        MockResponse::Success(Response::with_headers(
            status,
            headers,
            Bytes::from(body.to_string()),
        ))
    }

    /// A response with a plain text body.
    pub fn text(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }
}

type Handler = Arc<dyn Fn(&Request) -> MockResponse + Send + Sync>;
type RouteKey = (Method, String);

/// Mock HTTP client for testing.
///
/// Responses are looked up per `(method, url)` in this order:
/// 1. one-shot responses queued with [`MockHttpClient::push_response`]
/// 2. a handler set with [`MockHttpClient::set_handler`]
/// 3. a persistent response set with [`MockHttpClient::set_response`]
/// 4. the default response
///
/// Clones share configuration and recorded requests.
///
/// # Example
///
/// ```ignore
/// use netkit::adapters::mock::{MockHttpClient, MockResponse};
/// use netkit::traits::{HttpClient, Method, Request};
///
/// let client = MockHttpClient::new();
/// client.push_response(Method::Get, "https://api.example.com/orders/42", MockResponse::status(401));
/// client.set_response(
///     Method::Get,
///     "https://api.example.com/orders/42",
///     MockResponse::json(200, serde_json::json!({ "id": 42 })),
/// );
///
/// let request = Request::new(Method::Get, "https://api.example.com/orders/42");
/// assert_eq!(client.send(request.clone()).await?.status, 401);
/// assert_eq!(client.send(request).await?.status, 200);
/// assert_eq!(client.request_count(), 2);
/// ```
#[derive(Clone, Default)]
pub struct MockHttpClient {
    queued: Arc<Mutex<HashMap<RouteKey, VecDeque<MockResponse>>>>,
    handlers: Arc<Mutex<HashMap<RouteKey, Handler>>>,
    responses: Arc<Mutex<HashMap<RouteKey, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response for every request to `method url`.
    pub fn set_response(&self, method: Method, url: &str, response: MockResponse) {
        lock(&self.responses).insert((method, url.to_string()), response);
    }

    /// Queue a response used once, before any persistent response.
    pub fn push_response(&self, method: Method, url: &str, response: MockResponse) {
        lock(&self.queued)
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Compute the response for `method url` from the request itself.
    pub fn set_handler<F>(&self, method: Method, url: &str, handler: F)
    where
        F: Fn(&Request) -> MockResponse + Send + Sync + 'static,
    {
        lock(&self.handlers).insert((method, url.to_string()), Arc::new(handler));
    }

    /// Set a default response for requests without a specific match.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Delay every response. The request is recorded before the delay.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Recorded requests to `method url`.
    pub fn requests_to(&self, method: Method, url: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn resolve(&self, request: &Request) -> Option<MockResponse> {
        let key = (request.method, request.url.clone());

        if let Some(response) = lock(&self.queued)
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
        {
            return Some(response);
        }

        let handler = lock(&self.handlers).get(&key).cloned();
        if let Some(handler) = handler {
            return Some(handler(request));
        }

        if let Some(response) = lock(&self.responses).get(&key) {
            return Some(response.clone());
        }

        lock(&self.default_response).clone()
    }
}

impl std::fmt::Debug for MockHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHttpClient")
            .field("requests", &self.request_count())
            .finish()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, request: Request) -> Result<Response, HttpError> {
        lock(&self.requests).push(RecordedRequest::from(&request));

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.resolve(&request) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                request.method, request.url
            ))),
        }
    }
}
