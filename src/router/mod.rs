//! Extractor router.

use std::sync::Arc;

use crate::extractors::{Extractor, NotebookExtractor, PdfExtractor, PlainTextExtractor};
use crate::types::FileKind;

/// Router that selects the extractor for a file.
///
/// The router looks only at the file extension; content is never sniffed.
pub struct ExtractorRouter {
    /// Legacy page-aware PDF extractor
    pdf_extractor: Arc<PdfExtractor>,
    /// Notebook extractor (for .ipynb)
    notebook_extractor: Arc<NotebookExtractor>,
    /// Plain-text extractor (fallback for every other extension)
    plain_text_extractor: Arc<PlainTextExtractor>,
}

impl ExtractorRouter {
    /// Create a router with the given plain-text extractor.
    pub fn new(plain_text_extractor: PlainTextExtractor) -> Self {
        Self {
            pdf_extractor: Arc::new(PdfExtractor::new()),
            notebook_extractor: Arc::new(NotebookExtractor::new()),
            plain_text_extractor: Arc::new(plain_text_extractor),
        }
    }

    /// Get the extractor for the given file kind.
    pub fn get_extractor(&self, kind: FileKind) -> Arc<dyn Extractor> {
        match kind {
            FileKind::Pdf => Arc::clone(&self.pdf_extractor) as Arc<dyn Extractor>,
            FileKind::Notebook => Arc::clone(&self.notebook_extractor) as Arc<dyn Extractor>,
            FileKind::PlainText => Arc::clone(&self.plain_text_extractor) as Arc<dyn Extractor>,
        }
    }

    /// The legacy PDF extractor, for callers that already parsed the PDF.
    pub fn pdf_extractor(&self) -> &PdfExtractor {
        &self.pdf_extractor
    }

    /// List all available extractors.
    pub fn list_extractors(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            (self.pdf_extractor.name(), self.pdf_extractor.description()),
            (self.notebook_extractor.name(), self.notebook_extractor.description()),
            (self.plain_text_extractor.name(), self.plain_text_extractor.description()),
        ]
    }
}

impl Default for ExtractorRouter {
    fn default() -> Self {
        Self::new(PlainTextExtractor::default())
    }
}
