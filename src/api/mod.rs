//! API Module
//!
//! HTTP handlers and routing for the cache node.
//!
//! # Endpoints
//! - `GET /_peercache/:group/:key` - Raw value bytes (peer protocol)
//! - `GET /api/:group/:key` - Value as JSON
//! - `GET /stats` - Per-group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
