//! Document ingestion library
//!
//! Turns PDFs, Jupyter notebooks, plain text and zip bundles of them into
//! fixed-size, overlapping text chunks for retrieval-augmented chat.
//! PDFs go through an external OCR service first and fall back to
//! page-aware local extraction.

pub mod api;
pub mod archive;
pub mod batch;
pub mod chunkers;
pub mod error;
pub mod extractors;
pub mod ocr;
pub mod router;
pub mod sources;
pub mod types;

pub use batch::{BatchError, BatchProcessor, BatchResult};
pub use chunkers::{chunk_pages, chunk_text};
pub use error::{IngestError, OcrError};
pub use extractors::Extractor;
pub use router::ExtractorRouter;
pub use types::{Chunk, ChunkingParams, Document, ExtractionItem, IngestConfig};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::batch::*;
    pub use crate::error::*;
    pub use crate::extractors::Extractor;
    pub use crate::ocr::{OcrBridge, OcrService, PollPolicy};
    pub use crate::router::ExtractorRouter;
    pub use crate::sources::*;
    pub use crate::types::*;
}

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Default chunk overlap in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;
