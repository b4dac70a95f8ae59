//! API Handlers
//!
//! HTTP request handlers for the peer endpoint and the client API.
//!
//! `Group::get` may block on the data source, a remote peer, or another
//! caller's in-flight load, so handlers run it on the blocking thread pool.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::error;

use crate::cache::ByteView;
use crate::error::{CacheError, Result};
use crate::group::Registry;
use crate::models::{GetResponse, GroupStatsResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups served by this node
    pub registry: Arc<Registry>,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

/// Looks up `group` and resolves `key` on a blocking thread.
async fn load(state: &AppState, group: &str, key: String) -> Result<ByteView> {
    let group = state
        .registry
        .get_group(group)
        .ok_or_else(|| CacheError::GroupNotFound(group.to_string()))?;

    tokio::task::spawn_blocking(move || group.get(&key))
        .await
        .map_err(|e| {
            error!(error = %e, "group load task failed");
            CacheError::Internal(e.to_string())
        })?
}

/// Handler for GET /_peercache/:group/:key
///
/// Peer protocol endpoint: returns the raw value bytes.
pub async fn peer_get_handler(
    State(state): State<AppState>,
    Path((group, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let value = load(&state, &group, key).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        value.byte_slice(),
    ))
}

/// Handler for GET /api/:group/:key
///
/// Client endpoint: returns the value as JSON.
pub async fn api_get_handler(
    State(state): State<AppState>,
    Path((group, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let value = load(&state, &group, key.clone()).await?;
    Ok(Json(GetResponse::new(group, key, value.as_str())))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let groups = state
        .registry
        .groups()
        .iter()
        .map(|group| GroupStatsResponse::from_group(group))
        .collect();

    Json(StatsResponse { groups })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
