//! Batch ingestion with per-item failure isolation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::archive;
use crate::chunkers::chunk_text;
use crate::error::IngestError;
use crate::extractors::load_pdf;
use crate::ocr::OcrBridge;
use crate::router::ExtractorRouter;
use crate::sources::{BucketSource, FolderSource};
use crate::types::{Chunk, ChunkingParams, Document, ExtractionItem, FileKind};

/// Result of batch processing.
///
/// Chunks keep item enumeration order, and source order within an item.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub chunks: Vec<Chunk>,
    pub failures: Vec<BatchError>,
    pub total_items: usize,
    pub processed_items: usize,
}

impl BatchResult {
    fn with_capacity(total_items: usize) -> Self {
        Self {
            chunks: Vec::new(),
            failures: Vec::new(),
            total_items,
            processed_items: 0,
        }
    }

    /// True when no item was skipped.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, item: &str, error: &IngestError) {
        warn!(item = %item, error = %error, "Skipping item");
        self.failures.push(BatchError {
            item: item.to_string(),
            error: error.to_string(),
        });
    }
}

/// An item that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchError {
    pub item: String,
    pub error: String,
}

/// Turns items from any source into one ordered chunk sequence.
pub struct BatchProcessor {
    router: Arc<ExtractorRouter>,
    ocr: Option<Arc<OcrBridge>>,
    params: ChunkingParams,
}

impl BatchProcessor {
    /// Create a new batch processor.
    pub fn new(router: Arc<ExtractorRouter>, params: ChunkingParams) -> Self {
        Self {
            router,
            ocr: None,
            params,
        }
    }

    /// Try OCR on every PDF before the legacy extractor.
    pub fn with_ocr(mut self, ocr: Arc<OcrBridge>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn params(&self) -> &ChunkingParams {
        &self.params
    }

    pub fn ocr_enabled(&self) -> bool {
        self.ocr.is_some()
    }

    /// Extract one item, named and keyed by its file name.
    pub async fn process_item(&self, item: &ExtractionItem) -> Result<Vec<Chunk>, IngestError> {
        let document = Arc::new(Document::from_file_name(&item.file_name));
        self.process_document(&item.content, &document, item.kind()).await
    }

    /// Extract `content` for an explicit document.
    pub async fn process_document(
        &self,
        content: &[u8],
        document: &Arc<Document>,
        kind: FileKind,
    ) -> Result<Vec<Chunk>, IngestError> {
        let chunks = match kind {
            FileKind::Pdf => self.process_pdf(content, document).await?,
            other => self
                .router
                .get_extractor(other)
                .extract(content, document, &self.params)?,
        };

        debug!(file = %document.name, kind = %kind, chunks = chunks.len(), "Processed item");
        Ok(chunks)
    }

    /// OCR first; any OCR failure falls back to page-aware extraction.
    async fn process_pdf(
        &self,
        content: &[u8],
        document: &Arc<Document>,
    ) -> Result<Vec<Chunk>, IngestError> {
        let pdf = load_pdf(content, &document.name)?;

        if let Some(ocr) = &self.ocr {
            match ocr.recognize(&document.name, content).await {
                Ok(text) => return Ok(chunk_text(&text, document, &self.params)),
                Err(e) => {
                    warn!(file = %document.name, error = %e, "OCR failed, using legacy PDF extraction")
                }
            }
        }

        Ok(self
            .router
            .pdf_extractor()
            .extract_loaded(&pdf, document, &self.params))
    }

    /// Process in-memory items in order, skipping any that fail.
    pub async fn process_items(&self, items: Vec<ExtractionItem>) -> BatchResult {
        let mut result = BatchResult::with_capacity(items.len());
        info!(total_items = items.len(), "Starting batch processing");

        for item in &items {
            self.ingest_into(&mut result, item).await;
        }

        self.finish(result)
    }

    /// Process every regular file under a local directory.
    ///
    /// Only an unreadable root fails the call. Unreadable entries below it
    /// are recorded as failures.
    pub async fn process_folder(&self, source: &FolderSource) -> Result<BatchResult, IngestError> {
        let listing = source.list().await?;
        let mut result = BatchResult::with_capacity(listing.files.len() + listing.errors.len());
        info!(root = %source.root().display(), total_items = result.total_items, "Starting folder ingestion");

        for (path, error) in &listing.errors {
            result.record_failure(path, error);
        }

        for path in &listing.files {
            match source.read(path).await {
                Ok(item) => self.ingest_into(&mut result, &item).await,
                Err(e) => result.record_failure(&path.display().to_string(), &e),
            }
        }

        Ok(self.finish(result))
    }

    /// Process every object in a bucket.
    ///
    /// A listing failure fails the call; download failures skip the object.
    pub async fn process_bucket(&self, source: &BucketSource) -> Result<BatchResult, IngestError> {
        let locations = source.list().await?;
        let mut result = BatchResult::with_capacity(locations.len());
        info!(total_items = locations.len(), "Starting bucket ingestion");

        for location in &locations {
            match source.fetch(location).await {
                Ok(item) => self.ingest_into(&mut result, &item).await,
                Err(e) => result.record_failure(&location.to_string(), &e),
            }
        }

        Ok(self.finish(result))
    }

    /// Process an uploaded file: one supported file, or a zip of them.
    ///
    /// Unsupported uploads are rejected before anything is extracted.
    pub async fn process_upload(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<BatchResult, IngestError> {
        let items = archive::expand(file_name, content)?;
        Ok(self.process_items(items).await)
    }

    async fn ingest_into(&self, result: &mut BatchResult, item: &ExtractionItem) {
        match self.process_item(item).await {
            Ok(chunks) => {
                result.chunks.extend(chunks);
                result.processed_items += 1;
            }
            Err(e) => result.record_failure(&item.file_name, &e),
        }
    }

    fn finish(&self, result: BatchResult) -> BatchResult {
        info!(
            processed = result.processed_items,
            failed = result.failures.len(),
            chunks = result.chunks.len(),
            "Batch processing complete"
        );
        result
    }
}
