//! API Routes
//!
//! Configures the Axum router with all cache node endpoints.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    api_get_handler, health_handler, peer_get_handler, stats_handler, AppState,
};
use crate::peers::PEER_BASE_PATH;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /_peercache/:group/:key` - Raw value bytes (peer protocol)
/// - `GET /api/:group/:key` - Value as JSON
/// - `GET /stats` - Per-group statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            &format!("/{PEER_BASE_PATH}/:group/:key"),
            get(peer_get_handler),
        )
        .route("/api/:group/:key", get(api_get_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
