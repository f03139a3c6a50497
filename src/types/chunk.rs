//! Chunk and document type definitions.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A source document that chunks are derived from.
///
/// One `Document` is shared by every chunk produced from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Display name, usually the file name
    pub name: String,

    /// Free-text citation (may be empty)
    pub citation: String,

    /// Unique key for the document
    pub key: String,
}

impl Document {
    /// Create a document with an explicit citation and key.
    pub fn new(name: impl Into<String>, citation: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            citation: citation.into(),
            key: key.into(),
        }
    }

    /// Create a document keyed and named by its file name, with no citation.
    pub fn from_file_name(file_name: &str) -> Self {
        Self::new(file_name, "", file_name)
    }
}

/// Inclusive range of 1-based PDF page numbers that contributed to a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub first: u32,
    pub last: u32,
}

impl PageRange {
    /// A range covering one page.
    pub fn single(page: u32) -> Self {
        Self { first: page, last: page }
    }

    /// Extend the range to include `page`.
    pub fn extend_to(&mut self, page: u32) {
        self.last = page;
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// A contiguous slice of extracted text.
///
/// Chunks are the unit handed to the embedding/indexing stage. Each chunk
/// keeps a shared reference to the document it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk
    pub id: Uuid,

    /// The document this chunk was extracted from
    pub document: Arc<Document>,

    /// The actual text content of the chunk
    pub content: String,

    /// Human-readable locator, e.g. "notes.txt chunk 3" or "paper.pdf pages 2-4"
    pub label: String,

    /// Order of this chunk within its document (0-indexed)
    pub chunk_index: usize,

    /// Source pages (legacy PDF extraction only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<PageRange>,

    /// When this chunk was created
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    /// Create a chunk labelled by its sequential index.
    pub fn indexed(document: &Arc<Document>, content: String, chunk_index: usize) -> Self {
        let label = format!("{} chunk {}", document.name, chunk_index);
        Self::build(document, content, label, chunk_index, None)
    }

    /// Create a chunk labelled by the PDF pages it spans.
    pub fn paged(
        document: &Arc<Document>,
        content: String,
        chunk_index: usize,
        pages: PageRange,
    ) -> Self {
        let label = format!("{} pages {}", document.name, pages);
        Self::build(document, content, label, chunk_index, Some(pages))
    }

    fn build(
        document: &Arc<Document>,
        content: String,
        label: String,
        chunk_index: usize,
        pages: Option<PageRange>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document: Arc::clone(document),
            content,
            label,
            chunk_index,
            pages,
            created_at: Utc::now(),
        }
    }

    /// Length of the chunk content in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
