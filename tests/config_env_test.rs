//! Tests for reading configuration from `NETKIT_*` environment variables.
//!
//! These tests mutate process environment and run serially.

use std::time::Duration;

use netkit::config::{ClientConfig, Environment, MonitorConfig, DEFAULT_API_URL};
use netkit::error::ApiError;
use serial_test::serial;

const VARS: &[&str] = &[
    "NETKIT_API_URL",
    "NETKIT_API_VERSION",
    "NETKIT_ENVIRONMENT",
    "NETKIT_TIMEOUT_MS",
    "NETKIT_POLL_INTERVAL_MS",
    "NETKIT_PROBE_ENDPOINT",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_client_config_defaults_without_env() {
    clear_env();

    let config = ClientConfig::from_env().unwrap();

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.api_version, "v1");
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.timeout, Duration::from_millis(30_000));
}

#[test]
#[serial]
fn test_client_config_reads_env() {
    clear_env();
    std::env::set_var("NETKIT_API_URL", "https://api.staging.example.com/");
    std::env::set_var("NETKIT_ENVIRONMENT", "production");
    std::env::set_var("NETKIT_TIMEOUT_MS", "1500");

    let config = ClientConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.api_url, "https://api.staging.example.com");
    assert_eq!(
        config.refresh_url(),
        "https://api.staging.example.com/auth/refresh"
    );
    assert!(config.environment.is_production());
    assert_eq!(config.timeout, Duration::from_millis(1500));
}

#[test]
#[serial]
fn test_client_config_rejects_relative_url() {
    clear_env();
    std::env::set_var("NETKIT_API_URL", "/api");

    let result = ClientConfig::from_env();
    clear_env();

    assert!(matches!(result, Err(ApiError::Config { .. })));
}

#[test]
#[serial]
fn test_monitor_config_reads_env() {
    clear_env();
    std::env::set_var("NETKIT_POLL_INTERVAL_MS", "500");
    std::env::set_var("NETKIT_PROBE_ENDPOINT", "8.8.8.8:53");

    let config = MonitorConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.poll_interval, Duration::from_millis(500));
    assert_eq!(config.probe_endpoint, "8.8.8.8:53");
    assert!(config.notify_transitions);
}

#[test]
#[serial]
fn test_monitor_config_rejects_zero_interval() {
    clear_env();
    std::env::set_var("NETKIT_POLL_INTERVAL_MS", "0");

    let result = MonitorConfig::from_env();
    clear_env();

    assert!(matches!(result, Err(ApiError::Config { .. })));
}
