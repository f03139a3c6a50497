//! Places ingestion items come from.

mod bucket;
mod folder;

pub use bucket::{open_store, BucketSource};
pub use folder::{FolderListing, FolderSource};
