//! Chunking strategies.

mod base;
mod page_chunker;
mod window_chunker;

pub use base::{char_len, char_offsets, skip_chars, take_chars};
pub use page_chunker::chunk_pages;
pub use window_chunker::chunk_text;
