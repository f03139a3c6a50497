//! Core types for the ingestion service.

mod chunk;
mod config;
mod source;

pub use chunk::{Chunk, Document, PageRange};
pub use config::{ChunkingParams, IngestConfig};
pub use source::{extension, ExtractionItem, FileKind};
