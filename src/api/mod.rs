//! HTTP surface.

pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use handlers::AppState;

/// Largest accepted upload body (zip bundles of lecture PDFs get big).
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Build the HTTP routes.
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ingestion
        .route("/ingest/upload", post(handlers::ingest_upload))
        .route("/ingest/folder", post(handlers::ingest_folder))
        .route("/ingest/bucket", post(handlers::ingest_bucket))
        .route("/ingest/params", get(handlers::ingest_params))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
