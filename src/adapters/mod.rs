//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileCredentialStore`] - JSON file credential storage
//! - [`TcpProbe`] - Connectivity probe via TCP connect
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted HTTP responses
//! - [`mock::InMemoryCredentials`] - In-memory credential storage
//! - [`mock::ScriptedProbe`] - Scripted network states

pub mod file_credentials;
pub mod mock;
pub mod reqwest_http;
pub mod tcp_probe;

pub use file_credentials::FileCredentialStore;
pub use mock::{InMemoryCredentials, MockHttpClient, ScriptedProbe};
pub use reqwest_http::ReqwestHttpClient;
pub use tcp_probe::TcpProbe;
