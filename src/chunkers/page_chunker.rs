//! Page-aware sliding window used by legacy PDF extraction.

use std::sync::Arc;

use super::base::{char_len, skip_chars, take_chars};
use crate::types::{Chunk, ChunkingParams, Document, PageRange};

/// Accumulate page texts into a buffer and cut it into windows labelled by the
/// pages that contributed to each window.
///
/// After a cut the tracked range restarts at the page being processed, since
/// the carried-over remainder came from it.
pub fn chunk_pages<I>(pages: I, document: &Arc<Document>, params: &ChunkingParams) -> Vec<Chunk>
where
    I: IntoIterator<Item = (u32, String)>,
{
    let size = params.chunk_size();
    let stride = params.stride();

    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;
    let mut range: Option<PageRange> = None;

    for (page, text) in pages {
        buffer_len += char_len(&text);
        buffer.push_str(&text);
        match range.as_mut() {
            Some(r) => r.extend_to(page),
            None => range = Some(PageRange::single(page)),
        }

        while buffer_len > size {
            let pages = range.unwrap_or(PageRange::single(page));
            chunks.push(Chunk::paged(
                document,
                take_chars(&buffer, size).to_string(),
                chunks.len(),
                pages,
            ));
            buffer = skip_chars(&buffer, stride).to_string();
            buffer_len -= stride;
            range = Some(PageRange::single(page));
        }
    }

    if let Some(pages) = range {
        if buffer_len > params.overlap() || (chunks.is_empty() && buffer_len > 0) {
            chunks.push(Chunk::paged(
                document,
                take_chars(&buffer, size).to_string(),
                chunks.len(),
                pages,
            ));
        }
    }

    chunks
}
