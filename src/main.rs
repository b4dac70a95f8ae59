//! Peer Cache - A peer-aware in-process caching layer
//!
//! Runs one cache node: a demo `scores` group backed by a slow in-memory
//! database, sharded across the configured peers by consistent hashing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peercache::api::create_router;
use peercache::{spawn_stats_reporter, AppState, CacheError, Config, GetterFn, HttpPool, Registry};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the demo group and its peer pool
/// 4. Start the runtime, the stats reporter and the HTTP server
/// 5. Handle graceful shutdown on SIGINT/SIGTERM
///
/// The peer pool owns blocking HTTP clients, so it is built and dropped
/// outside the async runtime.
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Peer Cache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_bytes={}, port={}, self={}, peers={:?}",
        config.cache_bytes, config.server_port, config.self_url, config.peers
    );

    let registry = Arc::new(Registry::new());
    let scores = registry.new_group("scores", config.cache_bytes, slow_db());

    let pool = Arc::new(HttpPool::new(config.self_url.clone(), config.ring_replicas));
    pool.set_peers(config.peers.clone());
    scores.register_peers(pool)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    // the registry outlives the runtime so peer clients drop on this thread
    runtime.block_on(serve(Arc::clone(&registry), &config))?;

    info!("Server shutdown complete");
    Ok(())
}

async fn serve(registry: Arc<Registry>, config: &Config) -> anyhow::Result<()> {
    let reporter_handle = spawn_stats_reporter(Arc::clone(&registry), config.stats_interval);

    let app = create_router(AppState::new(registry));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(reporter_handle))
        .await
        .context("serving HTTP")
}

/// Demo data source: a few scores behind a logged lookup.
fn slow_db() -> GetterFn<impl Fn(&str) -> peercache::Result<Vec<u8>> + Send + Sync> {
    let db: HashMap<&'static str, &'static str> =
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    GetterFn(move |key: &str| -> peercache::Result<Vec<u8>> {
        info!(key, "[SlowDB] search key");
        db.get(key)
            .map(|v| v.as_bytes().to_vec())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the stats reporter and allows graceful shutdown.
async fn shutdown_signal(reporter_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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

    reporter_handle.abort();
    warn!("Stats reporter aborted");
}
