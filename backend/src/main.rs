//! Subscription Service
//!
//! A REST API for managing user subscriptions and calculating their prorated
//! total cost over a month range.

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use subscription_service::api;
use subscription_service::config::Config;
use subscription_service::service::SubscriptionService;
use subscription_service::storage::SqliteSubscriptionRepository;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env file if there is one
    dotenv::dotenv().ok();

    // Load configuration
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Configuration loaded: {:?}", config);

    // Initialize storage and services
    let repo = SqliteSubscriptionRepository::connect(&config.database)
        .await
        .context("Failed to open database")?;
    let service = Arc::new(SubscriptionService::new(Arc::new(repo)));

    let app = api::router(service, config.server.request_timeout());

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("Server running on http://{}", addr);
    info!(environment = %config.app_env, "Version: {}", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("Received Ctrl+C"),
                _ = terminate.recv() => info!("Received SIGTERM"),
            },
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl+C");
    }

    info!("Shutting down gracefully...");
}
