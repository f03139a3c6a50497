//! Configuration types for chunking and the ingestion service.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

/// Sliding-window parameters, measured in characters.
///
/// Always satisfies `overlap < chunk_size`; the window would never advance
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChunkingParams")]
pub struct ChunkingParams {
    chunk_size: usize,
    overlap: usize,
}

#[derive(Deserialize)]
struct RawChunkingParams {
    chunk_size: usize,
    #[serde(default)]
    overlap: usize,
}

impl TryFrom<RawChunkingParams> for ChunkingParams {
    type Error = IngestError;

    fn try_from(raw: RawChunkingParams) -> Result<Self, Self::Error> {
        Self::new(raw.chunk_size, raw.overlap)
    }
}

impl ChunkingParams {
    /// Validate and create chunking parameters.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, IngestError> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(IngestError::InvalidParameters { chunk_size, overlap });
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Maximum characters per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Characters repeated between consecutive chunks.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// How far the window slides after each emitted chunk.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkingParams {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Global ingestion service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Characters per chunk
    pub chunk_size: usize,

    /// Characters repeated between chunks
    pub overlap: usize,

    /// HTTP port
    pub port: u16,

    /// Whether to try the OCR service before legacy PDF extraction
    pub ocr_enabled: bool,

    /// YAML file holding OCR credentials
    pub ocr_credentials_path: PathBuf,

    /// OCR submission endpoint
    pub ocr_api_url: String,

    /// Maximum number of result polls per document
    pub ocr_max_attempts: u32,

    /// Delay between result polls
    pub ocr_poll_interval_ms: u64,

    /// Timeout applied to each OCR request
    pub ocr_request_timeout_secs: u64,

    /// S3 bucket served by `/ingest/bucket` (credentials come from `AWS_*`)
    pub bucket_name: Option<String>,

    /// Local directory served by `/ingest/bucket` when no S3 bucket is set
    pub bucket_root: Option<PathBuf>,

    /// Bucket object name that marks the folder itself
    pub bucket_folder_marker: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            port: 3017,
            ocr_enabled: true,
            ocr_credentials_path: PathBuf::from(".env.yaml"),
            ocr_api_url: "https://api.mathpix.com/v3/pdf".to_string(),
            ocr_max_attempts: 100,
            ocr_poll_interval_ms: 2000,
            ocr_request_timeout_secs: 5,
            bucket_name: None,
            bucket_root: None,
            bucket_folder_marker: String::new(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from `INGEST_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("INGEST").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Validated chunking parameters.
    pub fn chunking_params(&self) -> Result<ChunkingParams, IngestError> {
        ChunkingParams::new(self.chunk_size, self.overlap)
    }

    /// Delay between OCR result polls.
    pub fn ocr_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ocr_poll_interval_ms)
    }

    /// Timeout for each OCR request.
    pub fn ocr_request_timeout(&self) -> Duration {
        Duration::from_secs(self.ocr_request_timeout_secs)
    }
}
