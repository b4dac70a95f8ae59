//! Error types for the peer cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for cache groups, peers and the HTTP surface.
///
/// Errors are `Clone` because a single deduplicated load hands the same
/// outcome to every caller that coalesced onto it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// `Group::get` was called with an empty key
    #[error("key is required")]
    EmptyKey,

    /// The data source has no value for the key
    #[error("key not found: {0}")]
    NotFound(String),

    /// No group is registered under the name
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// `Group::register_peers` was called a second time
    #[error("peers already registered for group {0}")]
    PeersAlreadyRegistered(String),

    /// A remote peer could not serve the request
    #[error("peer request failed: {0}")]
    Peer(String),

    /// The local data source failed. [`Getter`](crate::group::Getter)
    /// implementations return this for backend failures other than a
    /// missing key.
    #[error("data source error: {0}")]
    Source(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) | CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Peer(_) => StatusCode::BAD_GATEWAY,
            CacheError::PeersAlreadyRegistered(_)
            | CacheError::Source(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the peer cache.
pub type Result<T> = std::result::Result<T, CacheError>;
