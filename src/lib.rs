//! netkit - authenticated API client and connectivity monitor
//!
//! - [`api::ApiClient`] sends JSON requests with the stored bearer token and
//!   recovers from an expired access token with a single shared refresh.
//! - [`network::ConnectivityMonitor`] polls network state and reports
//!   lost/restored transitions.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod network;
pub mod traits;
