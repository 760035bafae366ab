//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Sends one fully-formed HTTP request
//! - [`CredentialStore`] - Synchronous string key-value credential storage
//! - [`NetworkProbe`] - Device network state queries

pub mod credentials;
pub mod http;
pub mod network;

pub use credentials::{CredentialStore, CredentialsError};
pub use http::{find_header, Headers, HttpClient, HttpError, Method, Request, Response};
pub use network::{NetworkProbe, ProbeError};
