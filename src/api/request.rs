//! Replayable request descriptors.

use crate::auth::{bearer, parse_bearer};
use crate::traits::{Request, Response};

/// Which send of a request a response belongs to.
///
/// A request starts as [`Attempt::First`]; the one permitted replay is
/// [`Attempt::Retried`]. There is no transition out of `Retried`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attempt {
    #[default]
    First,
    Retried,
}

impl Attempt {
    pub fn is_retried(&self) -> bool {
        matches!(self, Attempt::Retried)
    }
}

/// The original request, captured as it was sent, so it can be replayed
/// with a different access token.
///
/// The descriptor itself never changes; the retry marker travels
/// separately as an [`Attempt`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    request: Request,
}

impl PendingRequest {
    /// Capture a prepared request (headers already attached).
    pub fn capture(request: &Request) -> Self {
        Self {
            request: request.clone(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The bearer token the request was sent with, if any.
    pub fn sent_token(&self) -> Option<&str> {
        self.request.header("Authorization").and_then(parse_bearer)
    }

    /// Build the replay: the same method, URL, headers and body, with
    /// `Authorization` set to `token`.
    pub fn replay_with(&self, token: &str) -> Request {
        let mut replay = self.request.clone();
        replay.set_header("Authorization", bearer(token));
        replay
    }
}

/// What to do with a response after the interceptors have seen it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseAction {
    /// Hand the response back to the caller.
    Complete(Response),
    /// Send this request instead and use its response.
    Replay(Request),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Method;
    use bytes::Bytes;

    fn sent_request() -> Request {
        let mut request = Request::new(Method::Post, "http://api.test/orders")
            .with_body(Bytes::from(r#"{"sku":"abc"}"#));
        request.set_header("Content-Type", "application/json");
        request.set_header("Authorization", "Bearer A1");
        request
    }

    #[test]
    fn test_sent_token() {
        let pending = PendingRequest::capture(&sent_request());
        assert_eq!(pending.sent_token(), Some("A1"));

        let anonymous = PendingRequest::capture(&Request::new(Method::Get, "http://api.test/"));
        assert_eq!(anonymous.sent_token(), None);
    }

    #[test]
    fn test_replay_with_only_changes_authorization() {
        let original = sent_request();
        let pending = PendingRequest::capture(&original);

        let replay = pending.replay_with("A2");

        assert_eq!(replay.header("Authorization"), Some("Bearer A2"));
        assert_eq!(replay.method, original.method);
        assert_eq!(replay.url, original.url);
        assert_eq!(replay.body, original.body);
        assert_eq!(replay.header("Content-Type"), Some("application/json"));
        assert_eq!(replay.headers.len(), original.headers.len());
        // The captured request is untouched
        assert_eq!(pending.request(), &original);
    }

    #[test]
    fn test_attempt_default_is_first() {
        assert_eq!(Attempt::default(), Attempt::First);
        assert!(!Attempt::First.is_retried());
        assert!(Attempt::Retried.is_retried());
    }
}
