//! Housekeeper - background maintenance for a multiplayer game server
//!
//! Starts the housekeeping loops and serves the admin inspection API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use housekeeper::api::create_router;
use housekeeper::clock::SystemClock;
use housekeeper::session::{InMemoryRegistry, StatusCache};
use housekeeper::store::InMemoryStore;
use housekeeper::{initialize_housekeeping_tasks, AppState, Config, Scheduler, Services};

/// Main entry point for the housekeeper.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the store, registry and status cache
/// 4. Start the housekeeping tasks
/// 5. Serve the admin API on the configured port
/// 6. On SIGINT/SIGTERM stop the server, then cancel every task
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "housekeeper=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting housekeeper");

    let config = Config::from_env();
    info!(
        "Configuration loaded: subscription_sweep={}s, ghost_sweep={}s, keepalive={}s, status_refresh={}s, match_sweep={}s, match_grace={}s, port={}",
        config.subscription_sweep_interval,
        config.ghost_sweep_interval,
        config.keepalive_threshold,
        config.status_refresh_interval,
        config.match_sweep_interval,
        config.match_grace_period,
        config.admin_port
    );

    let store = Arc::new(InMemoryStore::new());
    let registry = Arc::new(InMemoryRegistry::new(store.clone()));
    registry.add_channel(&config.lobby_channel).await;

    let services = Services {
        store,
        registry,
        status: Arc::new(StatusCache::new()),
        clock: Arc::new(SystemClock),
    };

    let scheduler = Arc::new(Scheduler::new());
    initialize_housekeeping_tasks(&scheduler, &services, &config)
        .await
        .context("failed to start housekeeping tasks")?;
    info!("Housekeeping tasks started");

    let app = create_router(AppState::new(scheduler.clone(), services));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.admin_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Admin API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("admin server failed")?;

    scheduler.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
