//! Local directory source.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::IngestError;
use crate::types::ExtractionItem;

/// Every regular file under a directory, recursively.
///
/// Files are visited sorted by name within each directory so a batch is
/// deterministic. Extensions are not filtered; unknown types go to the
/// plain-text path.
#[derive(Debug, Clone)]
pub struct FolderSource {
    root: PathBuf,
}

/// Result of walking a folder.
#[derive(Debug, Default)]
pub struct FolderListing {
    /// Regular files in walk order
    pub files: Vec<PathBuf>,
    /// Entries below the root that could not be read, keyed by path
    pub errors: Vec<(String, IngestError)>,
}

impl FolderSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List candidate files in walk order on the blocking pool.
    ///
    /// Fails only when the root itself cannot be read. Unreadable entries
    /// below it are returned in [`FolderListing::errors`].
    pub async fn list(&self) -> Result<FolderListing, IngestError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || walk(&root))
            .await
            .map_err(std::io::Error::from)?
    }

    /// Read one listed file into an item named by its file name.
    pub async fn read(&self, path: &Path) -> Result<ExtractionItem, IngestError> {
        let content = tokio::fs::read(path).await?;
        Ok(ExtractionItem::new(content, item_name(path)))
    }
}

fn walk(root: &Path) -> Result<FolderListing, IngestError> {
    std::fs::metadata(root)?;

    let mut listing = FolderListing::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).display().to_string();
                warn!(path = %path, error = %e, "Unreadable entry");
                listing.errors.push((path, IngestError::Io(e.into())));
                continue;
            }
        };
        if entry.file_type().is_file() {
            listing.files.push(entry.into_path());
        }
    }

    debug!(
        root = %root.display(),
        files = listing.files.len(),
        errors = listing.errors.len(),
        "Listed folder"
    );
    Ok(listing)
}

/// File name of `path`, or the whole path if it has none.
pub(crate) fn item_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
