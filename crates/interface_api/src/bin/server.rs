//! Freight API server binary
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin freight-api
//!
//! FREIGHT_PORT=9000 FREIGHT_DATABASE_URL=postgres://... cargo run --bin freight-api
//! ```
//!
//! # Environment Variables
//!
//! * `FREIGHT_HOST` / `FREIGHT_PORT` - bind address (default: 0.0.0.0:8080)
//! * `FREIGHT_DATABASE_URL` - PostgreSQL connection string
//! * `FREIGHT_DB_MAX_CONNECTIONS` - pool size (default: 10)
//! * `FREIGHT_LOG_LEVEL` - log level, overridden by `RUST_LOG` (default: info)
//! * `FREIGHT_LOG_JSON` - emit JSON log lines (default: false)
//! * `FREIGHT_BUSINESS_TIMEZONE` - IANA zone for "today" (default: Asia/Kolkata)
//! * `FREIGHT_BLOB_STORE_URL` / `FREIGHT_BLOB_STORE_API_KEY` - object store

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_receipts::HttpBlobStore;
use infra_db::{PostgresLoadStore, PostgresReceiptLedger};
use interface_api::{config::ApiConfig, create_router, AppState, Ports};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid FREIGHT_* configuration")?;
    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        timezone = %config.business_timezone,
        "starting freight API server"
    );

    let pool = infra_db::create_pool(config.database())
        .await
        .context("failed to connect to database")?;
    infra_db::run_migrations(&pool).await?;

    let blobs = HttpBlobStore::new(config.blob_store()).context("failed to build blob store client")?;
    let ports = Ports {
        loads: Arc::new(PostgresLoadStore::new(pool.clone())),
        ledger: Arc::new(PostgresReceiptLedger::new(pool)),
        blobs: Arc::new(blobs),
    };

    let addr: SocketAddr = config.server_addr().parse()?;
    let state = AppState::new(config, ports)?;
    let app = create_router(state);

    tracing::info!(%addr, "server listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
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
