//! Ingestion items and file kinds.

use serde::{Deserialize, Serialize};

/// The extractor family a file is routed to.
///
/// This determines which extraction path is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// PDF (OCR first, legacy page extraction as fallback)
    Pdf,
    /// Jupyter notebook
    Notebook,
    /// Anything else, decoded as text
    PlainText,
}

impl FileKind {
    /// Pick the file kind from a file name's extension.
    ///
    /// Unknown extensions fall through to plain text.
    pub fn from_file_name(file_name: &str) -> Self {
        match extension(file_name).as_deref() {
            Some("pdf") => FileKind::Pdf,
            Some("ipynb") => FileKind::Notebook,
            _ => FileKind::PlainText,
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Pdf => write!(f, "pdf"),
            FileKind::Notebook => write!(f, "notebook"),
            FileKind::PlainText => write!(f, "plain_text"),
        }
    }
}

/// Lower-cased extension of a file name, without the dot.
pub fn extension(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(&['/', '\\'][..]).next().unwrap_or(file_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Raw file content paired with its file name.
///
/// Produced by archive expansion or source enumeration and consumed once by
/// the dispatch step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionItem {
    pub content: Vec<u8>,
    pub file_name: String,
}

impl ExtractionItem {
    pub fn new(content: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            file_name: file_name.into(),
        }
    }

    /// The file kind this item routes to.
    pub fn kind(&self) -> FileKind {
        FileKind::from_file_name(&self.file_name)
    }
}
