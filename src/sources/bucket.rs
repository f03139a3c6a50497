//! Object-store bucket source.

use std::sync::Arc;

use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::types::{ExtractionItem, IngestConfig};

/// Open the configured bucket backend, if any.
///
/// `bucket_name` selects S3 with credentials and region from the `AWS_*`
/// environment; otherwise `bucket_root` serves a local directory.
pub fn open_store(config: &IngestConfig) -> Result<Option<Arc<dyn ObjectStore>>, IngestError> {
    if let Some(bucket) = config.bucket_name.as_deref().filter(|b| !b.is_empty()) {
        let store = AmazonS3Builder::from_env()
            .with_url(format!("s3://{bucket}"))
            .build()?;
        info!(bucket, "Bucket source: S3");
        return Ok(Some(Arc::new(store)));
    }

    if let Some(root) = &config.bucket_root {
        let store = LocalFileSystem::new_with_prefix(root)?;
        info!(root = %root.display(), "Bucket source: local directory");
        return Ok(Some(Arc::new(store)));
    }

    Ok(None)
}

/// Objects in a bucket, optionally under a prefix.
///
/// Works with any `ObjectStore` backend. The object whose location equals the
/// folder marker (a placeholder some consoles create for "folders") is skipped.
pub struct BucketSource {
    store: Arc<dyn ObjectStore>,
    prefix: Option<ObjectPath>,
    folder_marker: String,
}

impl BucketSource {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            prefix: None,
            folder_marker: String::new(),
        }
    }

    /// Only list objects under `prefix`.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        self.prefix = (!prefix.is_empty()).then(|| ObjectPath::from(prefix));
        self
    }

    /// Skip the object stored at exactly this location.
    pub fn with_folder_marker(mut self, marker: impl Into<String>) -> Self {
        self.folder_marker = marker.into();
        self
    }

    /// List object locations, sorted by key.
    pub async fn list(&self) -> Result<Vec<ObjectPath>, IngestError> {
        let mut listing = self.store.list(self.prefix.as_ref());
        let mut locations = Vec::new();

        while let Some(meta) = listing.try_next().await? {
            if !self.folder_marker.is_empty()
                && meta.location.to_string() == self.folder_marker.trim_matches('/')
            {
                debug!(location = %meta.location, "Skipping folder marker");
                continue;
            }
            locations.push(meta.location);
        }

        locations.sort();
        info!(prefix = ?self.prefix.as_ref().map(|p| p.to_string()), objects = locations.len(), "Listed bucket");
        Ok(locations)
    }

    /// Download one object into an item named by its full key.
    pub async fn fetch(&self, location: &ObjectPath) -> Result<ExtractionItem, IngestError> {
        let bytes = self.store.get(location).await?.bytes().await?;
        Ok(ExtractionItem::new(bytes.to_vec(), location.to_string()))
    }
}
