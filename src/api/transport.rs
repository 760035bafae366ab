//! Request preparation and dispatch.
//!
//! [`Transport`] turns a method and path into a fully-formed [`Request`]
//! (base URL, default headers, timeout), runs the request interceptors over
//! it, sends it, and lets the interceptors decide whether the response is
//! final or the request should be replayed once.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use super::request::{Attempt, PendingRequest, ResponseAction};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::traits::{HttpClient, Method, Request, Response};

/// Hook run around every request the [`Transport`] sends.
///
/// Interceptors run in registration order in both phases.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Adjust an outgoing request before it is sent.
    fn on_request(&self, request: &mut Request);

    /// Inspect a response. The default completes with it unchanged.
    async fn on_response(
        &self,
        pending: &PendingRequest,
        attempt: Attempt,
        response: Response,
    ) -> ApiResult<ResponseAction> {
        let _ = (pending, attempt);
        Ok(ResponseAction::Complete(response))
    }
}

/// Sends requests relative to a base URL through an interceptor chain.
pub struct Transport {
    http: Arc<dyn HttpClient>,
    config: ClientConfig,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl Transport {
    pub fn new(http: Arc<dyn HttpClient>, config: ClientConfig) -> Self {
        Self {
            http,
            config,
            interceptors: Vec::new(),
        }
    }

    /// Append an interceptor to the chain.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve a path against the base URL. Absolute URLs pass through.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.config.api_url, path)
        } else {
            format!("{}/{}", self.config.api_url, path)
        }
    }

    /// Build a request with the default headers and timeout, then run
    /// every interceptor's request phase over it.
    pub fn prepare(&self, method: Method, path: &str, body: Option<Bytes>) -> Request {
        let mut request = Request::new(method, self.url_for(path)).with_timeout(self.config.timeout);
        for (name, value) in &self.config.default_headers {
            request.set_header(name, value.clone());
        }
        request.body = body;

        for interceptor in &self.interceptors {
            interceptor.on_request(&mut request);
        }
        request
    }

    /// Send a prepared request and return the final response, whatever
    /// its status.
    ///
    /// A request is sent at most twice: the original and one replay.
    pub async fn dispatch(&self, request: Request) -> ApiResult<Response> {
        let pending = PendingRequest::capture(&request);
        let mut attempt = Attempt::First;
        let mut next = request;

        loop {
            tracing::debug!(method = %next.method, url = %next.url, ?attempt, "Sending request");
            let response = self.http.send(next).await?;

            match self.on_response(&pending, attempt, response).await? {
                ResponseAction::Complete(response) => return Ok(response),
                ResponseAction::Replay(replay) => {
                    if attempt.is_retried() {
                        return Err(ApiError::Config {
                            message: "interceptor requested a second replay".to_string(),
                        });
                    }
                    attempt = Attempt::Retried;
                    next = replay;
                }
            }
        }
    }

    async fn on_response(
        &self,
        pending: &PendingRequest,
        attempt: Attempt,
        response: Response,
    ) -> ApiResult<ResponseAction> {
        let mut action = ResponseAction::Complete(response);
        for interceptor in &self.interceptors {
            action = match action {
                ResponseAction::Complete(response) => {
                    interceptor.on_response(pending, attempt, response).await?
                }
                replay @ ResponseAction::Replay(_) => return Ok(replay),
            };
        }
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn transport(http: &MockHttpClient) -> Transport {
        Transport::new(
            Arc::new(http.clone()),
            ClientConfig::new().with_api_url("http://api.test"),
        )
    }

    struct TagInterceptor(&'static str);

    #[async_trait]
    impl RequestInterceptor for TagInterceptor {
        fn on_request(&self, request: &mut Request) {
            let tags = request
                .header("X-Tags")
                .map(|t| format!("{},{}", t, self.0))
                .unwrap_or_else(|| self.0.to_string());
            request.set_header("X-Tags", tags);
        }
    }

    /// Replays every response, counting how often it is asked.
    struct AlwaysReplay(AtomicUsize);

    #[async_trait]
    impl RequestInterceptor for AlwaysReplay {
        fn on_request(&self, _request: &mut Request) {}

        async fn on_response(
            &self,
            pending: &PendingRequest,
            _attempt: Attempt,
            _response: Response,
        ) -> ApiResult<ResponseAction> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(ResponseAction::Replay(pending.request().clone()))
        }
    }

    #[test]
    fn test_url_for() {
        let http = MockHttpClient::new();
        let transport = transport(&http);
        assert_eq!(transport.url_for("/orders/42"), "http://api.test/orders/42");
        assert_eq!(transport.url_for("orders/42"), "http://api.test/orders/42");
        assert_eq!(
            transport.url_for("https://other.test/x"),
            "https://other.test/x"
        );
    }

    #[test]
    fn test_prepare_applies_defaults_and_interceptors_in_order() {
        let http = MockHttpClient::new();
        let transport = transport(&http)
            .with_interceptor(Arc::new(TagInterceptor("first")))
            .with_interceptor(Arc::new(TagInterceptor("second")));

        let request = transport.prepare(Method::Get, "/orders", None);

        assert_eq!(request.url, "http://api.test/orders");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.timeout, Some(transport.config().timeout));
        assert_eq!(request.header("X-Tags"), Some("first,second"));
    }

    #[tokio::test]
    async fn test_dispatch_returns_non_2xx_response() {
        let http = MockHttpClient::new();
        http.set_response(
            Method::Get,
            "http://api.test/missing",
            MockResponse::status(404),
        );
        let transport = transport(&http);

        let request = transport.prepare(Method::Get, "/missing", None);
        let response = transport.dispatch(request).await.unwrap();

        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_dispatch_transport_error() {
        let http = MockHttpClient::new();
        let transport = transport(&http);
        http.set_default(MockResponse::Error(crate::traits::HttpError::ConnectionFailed(
            "refused".to_string(),
        )));

        let request = transport.prepare(Method::Get, "/orders", None);
        let err = transport.dispatch(request).await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_dispatch_replays_at_most_once() {
        let http = MockHttpClient::new();
        http.set_response(Method::Get, "http://api.test/loop", MockResponse::status(200));
        let replayer = Arc::new(AlwaysReplay(AtomicUsize::new(0)));
        let transport = transport(&http).with_interceptor(replayer.clone());

        let request = transport.prepare(Method::Get, "/loop", None);
        let result = transport.dispatch(request).await;

        assert!(matches!(result, Err(ApiError::Config { .. })));
        assert_eq!(http.request_count(), 2);
        assert_eq!(replayer.0.load(Ordering::SeqCst), 2);
    }
}
