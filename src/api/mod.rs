//! API client.
//!
//! - [`ApiClient`] - typed `get`/`post`/`put`/`patch`/`delete` helpers
//! - [`Transport`] - base URL, default headers and the interceptor chain
//! - [`PendingRequest`] / [`Attempt`] - the replayable original request

pub mod client;
pub mod request;
pub mod transport;

pub use client::ApiClient;
pub use request::{Attempt, PendingRequest, ResponseAction};
pub use transport::{RequestInterceptor, Transport};
