use netkit::adapters::{FileCredentialStore, TcpProbe};
use netkit::api::ApiClient;
use netkit::auth::AuthEvents;
use netkit::config::{ClientConfig, MonitorConfig};
use netkit::network::{ConnectivityListener, ConnectivityMonitor};

use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Usage:
  netkit get <path>   Authenticated GET, prints the JSON response
  netkit watch        Log connectivity changes until Ctrl-C
  netkit --version    Print the version

Configuration is read from NETKIT_API_URL, NETKIT_API_VERSION,
NETKIT_ENVIRONMENT, NETKIT_TIMEOUT_MS, NETKIT_POLL_INTERVAL_MS and
NETKIT_PROBE_ENDPOINT. Log level follows RUST_LOG (default netkit=info).";

/// Prints a sign-in hint once the stored session is gone.
struct SignInHint;

impl AuthEvents for SignInHint {
    fn on_auth_expired(&self) {
        eprintln!("Session expired. Sign in again to continue.");
    }
}

/// Prints connectivity transitions the way the app shows its toasts.
struct ConsoleListener;

impl ConnectivityListener for ConsoleListener {
    fn on_connectivity_lost(&self) {
        println!("No Internet Connection: please check your network settings");
    }

    fn on_connectivity_restored(&self) {
        println!("Back Online: your internet connection has been restored");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netkit=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_get(path: &str) -> Result<()> {
    let config = ClientConfig::from_env().wrap_err("invalid client configuration")?;
    let store = FileCredentialStore::open_default().wrap_err("failed to open credential store")?;
    let client = ApiClient::from_config(config, Arc::new(store), Arc::new(SignInHint))?;

    let value: serde_json::Value = client
        .get(path)
        .await
        .wrap_err_with(|| format!("GET {} failed", path))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn run_watch() -> Result<()> {
    let config = MonitorConfig::from_env().wrap_err("invalid monitor configuration")?;
    let probe = TcpProbe::from_config(&config);
    println!(
        "Watching connectivity via {} every {:?} (Ctrl-C to stop)",
        probe.endpoint(),
        config.poll_interval
    );

    let monitor = ConnectivityMonitor::new(Arc::new(probe), config);
    monitor.add_listener(Arc::new(ConsoleListener));
    let handle = monitor.start();

    tokio::signal::ctrl_c()
        .await
        .wrap_err("failed to listen for Ctrl-C")?;

    handle.shutdown().await;
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Handle --version flag before any initialization
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("netkit {}", VERSION);
        return Ok(());
    }

    if args.is_empty() || args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    color_eyre::install()?;
    init_tracing();

    let runtime = tokio::runtime::Runtime::new()?;

    match args[0].as_str() {
        "get" => match args.get(1) {
            Some(path) => runtime.block_on(run_get(path)),
            None => bail!("missing <path>\n\n{}", USAGE),
        },
        "watch" => runtime.block_on(run_watch()),
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }
}
