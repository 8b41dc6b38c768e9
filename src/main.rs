//! Snapshot Panel - backend for a design-tool side panel
//!
//! Shows site metadata and a preview of the selected canvas element,
//! caching element snapshots with a TTL and a capacity bound.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapshot_panel::api::create_router;
use snapshot_panel::host::HttpHost;
use snapshot_panel::{spawn_sweep_task, AppState, Config};

/// Main entry point for the panel backend.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Connect the host bridge and build the application state
/// 4. Load site info and the current selection in the background
/// 5. Start the expiry sweep task if enabled
/// 6. Serve the HTTP API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapshot_panel=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Snapshot Panel");

    let config = Config::from_env();
    if let Some(error_msg) = config.validate() {
        bail!("Invalid configuration: {}", error_msg);
    }
    info!(
        "Configuration loaded: cache_max_size={}, cache_ttl_ms={}, port={}, host={}, cleanup_interval={}s",
        config.cache_max_size,
        config.cache_ttl_ms,
        config.server_port,
        config.host_api_url,
        config.cleanup_interval
    );

    let host = HttpHost::new(&config.host_api_url).context("Failed to create host client")?;
    let state = AppState::from_config(config.clone(), Arc::new(host));
    info!("Snapshot cache initialized");

    {
        let site = state.site.clone();
        tokio::spawn(async move { site.load().await });
    }
    {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(err) = state
                .selection
                .refresh_from(state.selection_source.as_ref())
                .await
            {
                warn!(error = %err, "Could not read initial selection from host");
            }
        });
    }

    let sweep_handle = (config.cleanup_interval > 0).then(|| {
        info!("Background expiry sweep started");
        spawn_sweep_task(
            state.cache.clone(),
            Duration::from_secs(config.cleanup_interval),
        )
    });

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
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
                warn!(error = %err, "Failed to install SIGTERM handler");
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

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Expiry sweep task aborted");
    }
}
