//! Authentication module.
//!
//! This module provides:
//! - Credential pair access and session helpers over a [`CredentialStore`]
//! - The bearer token interceptor with refresh-and-retry on 401
//! - Single-flight access token refresh
//!
//! [`CredentialStore`]: crate::traits::CredentialStore

pub mod credentials;
pub mod events;
pub mod interceptor;
pub mod refresh;

pub use credentials::{
    clear_tokens, CredentialPair, Session, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
pub use events::{AuthEvents, NoopAuthEvents};
pub use interceptor::{bearer, parse_bearer, AuthInterceptor};
pub use refresh::{RefreshCoordinator, RefreshRequest, TokenResponse};
