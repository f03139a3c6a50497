//! Format-specific extraction of raw bytes into chunks.

mod notebook;
mod pdf;
mod plaintext;

use std::sync::Arc;

use crate::error::IngestError;
use crate::types::{Chunk, ChunkingParams, Document};

pub use notebook::{notebook_text, NotebookExtractor};
pub use pdf::{load_pdf, pdf_page_texts, PdfExtractor};
pub use plaintext::{PlainTextExtractor, TextDecoder, TextEncoding};

#[cfg(test)]
pub(crate) use pdf::test_support;

/// The core trait that all extractors implement.
///
/// An extractor turns the raw bytes of one file into an ordered sequence of
/// chunks, or fails without producing any.
pub trait Extractor: Send + Sync {
    /// Get the name of this extractor.
    fn name(&self) -> &'static str;

    /// Extract chunks from `content`.
    ///
    /// # Arguments
    /// * `content` - Raw file bytes
    /// * `document` - The document every produced chunk refers to
    /// * `params` - Window size and overlap
    fn extract(
        &self,
        content: &[u8],
        document: &Arc<Document>,
        params: &ChunkingParams,
    ) -> Result<Vec<Chunk>, IngestError>;

    /// Get the description of this extractor.
    fn description(&self) -> &'static str {
        "A document extractor"
    }
}
