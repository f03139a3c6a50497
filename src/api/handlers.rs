//! HTTP request handlers for the ingestion service.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::batch::{BatchProcessor, BatchResult};
use crate::error::IngestError;
use crate::router::ExtractorRouter;
use crate::sources::{BucketSource, FolderSource};

/// Application state shared across handlers.
pub struct AppState {
    pub processor: BatchProcessor,
    pub router: Arc<ExtractorRouter>,
    /// Backend for `/ingest/bucket`; `None` disables the endpoint
    pub bucket: Option<Arc<dyn ObjectStore>>,
    pub bucket_folder_marker: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Ingest an uploaded file (multipart field `file`): one supported document
/// or a zip archive of them.
pub async fn ingest_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<BatchResult>, IngestError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IngestError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| IngestError::InvalidRequest("upload has no file name".to_string()))?;
        let content = field
            .bytes()
            .await
            .map_err(|e| IngestError::InvalidRequest(e.to_string()))?;

        info!(file = %file_name, bytes = content.len(), "Received upload");
        let result = state.processor.process_upload(&file_name, content.to_vec()).await?;
        return Ok(Json(result));
    }

    Err(IngestError::InvalidRequest("missing multipart field 'file'".to_string()))
}

/// Ingest folder request.
#[derive(Debug, Deserialize)]
pub struct IngestFolderRequest {
    pub path: PathBuf,
}

/// Ingest every file under a directory on the server.
pub async fn ingest_folder(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngestFolderRequest>,
) -> Result<Json<BatchResult>, IngestError> {
    let is_dir = tokio::fs::metadata(&request.path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(IngestError::InvalidRequest(format!(
            "{} is not a directory",
            request.path.display()
        )));
    }

    info!(path = %request.path.display(), "Received folder ingestion request");
    let result = state
        .processor
        .process_folder(&FolderSource::new(request.path))
        .await?;
    Ok(Json(result))
}

/// Ingest bucket request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IngestBucketRequest {
    /// Only ingest objects under this key prefix
    pub prefix: Option<String>,
}

/// Ingest every object in the configured bucket.
pub async fn ingest_bucket(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngestBucketRequest>,
) -> Result<Json<BatchResult>, IngestError> {
    let store = state
        .bucket
        .clone()
        .ok_or_else(|| IngestError::InvalidRequest("no bucket configured".to_string()))?;

    let mut source = BucketSource::new(store).with_folder_marker(state.bucket_folder_marker.clone());
    if let Some(prefix) = &request.prefix {
        source = source.with_prefix(prefix);
    }

    info!(prefix = ?request.prefix, "Received bucket ingestion request");
    let result = state.processor.process_bucket(&source).await?;
    Ok(Json(result))
}

/// Extractor description.
#[derive(Debug, Serialize)]
pub struct ExtractorInfo {
    name: String,
    description: String,
}

/// Active ingestion parameters.
#[derive(Debug, Serialize)]
pub struct ParamsResponse {
    chunk_size: usize,
    overlap: usize,
    ocr_enabled: bool,
    extractors: Vec<ExtractorInfo>,
}

pub async fn ingest_params(State(state): State<Arc<AppState>>) -> Json<ParamsResponse> {
    let params = state.processor.params();
    let extractors = state
        .router
        .list_extractors()
        .into_iter()
        .map(|(name, desc)| ExtractorInfo {
            name: name.to_string(),
            description: desc.to_string(),
        })
        .collect();

    Json(ParamsResponse {
        chunk_size: params.chunk_size(),
        overlap: params.overlap(),
        ocr_enabled: state.processor.ocr_enabled(),
        extractors,
    })
}
