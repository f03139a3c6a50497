//! Legacy page-by-page PDF extraction.

use std::sync::Arc;

use lopdf::Document as PdfDocument;
use tracing::{debug, warn};

use super::Extractor;
use crate::chunkers::chunk_pages;
use crate::error::IngestError;
use crate::types::{Chunk, ChunkingParams, Document};

/// Parse PDF bytes, failing on a corrupt structure.
pub fn load_pdf(content: &[u8], file_name: &str) -> Result<PdfDocument, IngestError> {
    PdfDocument::load_mem(content)
        .map_err(|e| IngestError::extraction(file_name, format!("failed to load PDF: {e}")))
}

/// Extract text per page, in page order, numbered from 1.
///
/// A page whose text cannot be decoded contributes an empty string.
pub fn pdf_page_texts(pdf: &PdfDocument, file_name: &str) -> Vec<(u32, String)> {
    pdf.get_pages()
        .keys()
        .map(|&page_num| {
            let text = pdf.extract_text(&[page_num]).unwrap_or_else(|e| {
                warn!(file = %file_name, page = page_num, error = %e, "Failed to extract page text");
                String::new()
            });
            (page_num, text)
        })
        .collect()
}

/// Extractor that windows PDF text while tracking source page ranges.
///
/// Used directly when OCR is unavailable or has failed.
#[derive(Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Chunk an already-parsed PDF.
    pub fn extract_loaded(
        &self,
        pdf: &PdfDocument,
        document: &Arc<Document>,
        params: &ChunkingParams,
    ) -> Vec<Chunk> {
        let pages = pdf_page_texts(pdf, &document.name);
        debug!(file = %document.name, pages = pages.len(), "Extracted PDF pages");
        chunk_pages(pages, document, params)
    }
}

impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf_legacy"
    }

    fn description(&self) -> &'static str {
        "Page-aware PDF text extraction with page-range labels"
    }

    fn extract(
        &self,
        content: &[u8],
        document: &Arc<Document>,
        params: &ChunkingParams,
    ) -> Result<Vec<Chunk>, IngestError> {
        let pdf = load_pdf(content, &document.name)?;
        Ok(self.extract_loaded(&pdf, document, params))
    }
}
