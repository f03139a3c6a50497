//! Document Ingestion Service - Main Entry Point
//!
//! Chunks uploaded documents and server-side folders for RAG indexing.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docingest::api::{self, handlers::AppState};
use docingest::batch::BatchProcessor;
use docingest::ocr::{MathpixClient, OcrBridge, OcrCredentials, PollPolicy};
use docingest::router::ExtractorRouter;
use docingest::sources::open_store;
use docingest::types::IngestConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "docingest=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = IngestConfig::load()?;
    let params = config.chunking_params()?;

    info!("Starting Document Ingestion Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        chunk_size = params.chunk_size(),
        overlap = params.overlap(),
        "Chunking parameters"
    );

    // Initialize components
    let router = Arc::new(ExtractorRouter::default());
    let mut processor = BatchProcessor::new(router.clone(), params);
    if let Some(bridge) = ocr_bridge(&config) {
        processor = processor.with_ocr(Arc::new(bridge));
    }

    let bucket = open_store(&config)?;
    if bucket.is_none() {
        info!("No bucket configured, /ingest/bucket disabled");
    }

    let state = Arc::new(AppState {
        processor,
        router,
        bucket,
        bucket_folder_marker: config.bucket_folder_marker.clone(),
    });

    // Build HTTP routes
    let app = api::routes(state)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the OCR bridge, or `None` to run with legacy PDF extraction only.
fn ocr_bridge(config: &IngestConfig) -> Option<OcrBridge> {
    if !config.ocr_enabled {
        info!("OCR disabled by configuration");
        return None;
    }

    let client = OcrCredentials::from_yaml_file(&config.ocr_credentials_path).and_then(|creds| {
        MathpixClient::new(&config.ocr_api_url, creds, config.ocr_request_timeout())
    });

    match client {
        Ok(client) => {
            info!(api_url = %config.ocr_api_url, "OCR enabled");
            Some(OcrBridge::new(
                Arc::new(client),
                PollPolicy {
                    max_attempts: config.ocr_max_attempts,
                    interval: config.ocr_poll_interval(),
                },
            ))
        }
        Err(e) => {
            warn!(error = %e, "OCR unavailable, PDFs will use legacy extraction");
            None
        }
    }
}
