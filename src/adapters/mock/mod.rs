//! Mock implementations for testing.
//!
//! This module provides mock implementations of all trait abstractions,
//! enabling unit testing without network access or file system access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses
//! - [`InMemoryCredentials`] - In-memory credential storage
//! - [`ScriptedProbe`] - Network probe replaying a scripted sequence

pub mod credentials;
pub mod http;
pub mod network;

pub use credentials::InMemoryCredentials;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use network::ScriptedProbe;
