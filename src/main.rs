use clap::Parser;
use librepay::application::checkout::CheckoutService;
use librepay::application::settlement::SettlementEngine;
use librepay::domain::ports::{SaleStore, SettlementStore};
use librepay::infrastructure::fedapay::FedapayClient;
use librepay::infrastructure::in_memory::InMemoryStore;
#[cfg(feature = "storage-rocksdb")]
use librepay::infrastructure::rocksdb::RocksDBStore;
use librepay::interfaces::http::{self, AppState};
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Public base URL of this service, used to build the provider callback address
    #[arg(long, env = "BASE_URL")]
    base_url: String,

    /// FedaPay API secret key
    #[arg(long, env = "FEDAPAY_SECRET_KEY", hide_env_values = true)]
    fedapay_secret_key: String,

    /// FedaPay API base URL
    #[arg(long, env = "FEDAPAY_API_URL", default_value = "https://api.fedapay.com")]
    fedapay_api_url: String,

    /// Timeout for outbound provider calls, in seconds
    #[arg(long, default_value_t = 10)]
    provider_timeout_secs: u64,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "DB_PATH")]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    init_tracing();

    let provider = FedapayClient::new(
        &cli.fedapay_api_url,
        &cli.fedapay_secret_key,
        Duration::from_secs(cli.provider_timeout_secs),
    )
    .into_diagnostic()?;

    let callback_url = format!(
        "{}/api/fedapay/callback",
        cli.base_url.trim_end_matches('/')
    );

    let state = build_state(&cli, provider, callback_url)?;
    let app = http::router(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    tracing::info!("server shutdown complete");
    Ok(())
}

fn build_state(cli: &Cli, provider: FedapayClient, callback_url: String) -> Result<AppState> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(path) = &cli.db_path {
        let store = RocksDBStore::open(path).into_diagnostic()?;
        return Ok(wire_state(store, provider, callback_url));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if cli.db_path.is_some() {
        tracing::warn!(
            "persistent storage requested via --db-path, but the 'storage-rocksdb' feature \
             is not enabled; falling back to in-memory storage"
        );
    }

    Ok(wire_state(InMemoryStore::new(), provider, callback_url))
}

fn wire_state<S>(store: S, provider: FedapayClient, callback_url: String) -> AppState
where
    S: SaleStore + SettlementStore + Clone + 'static,
{
    AppState {
        checkout: CheckoutService::new(Box::new(provider), Box::new(store.clone()), callback_url),
        settlement: SettlementEngine::new(Box::new(store.clone()), Box::new(store)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
