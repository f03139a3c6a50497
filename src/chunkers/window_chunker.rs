//! Fixed-size sliding-window chunker with overlap.

use std::sync::Arc;

use super::base::char_offsets;
use crate::types::{Chunk, ChunkingParams, Document};

/// Split `text` into chunks of at most `chunk_size` characters, each starting
/// `chunk_size - overlap` characters after the previous one.
///
/// A text no longer than the window produces a single chunk (an empty text
/// produces one empty chunk only when `overlap > 0`). Every chunk is labelled
/// `"{document} chunk {index}"`.
pub fn chunk_text(text: &str, document: &Arc<Document>, params: &ChunkingParams) -> Vec<Chunk> {
    let size = params.chunk_size();
    let overlap = params.overlap();

    let offsets = char_offsets(text);
    let total = offsets.len() - 1;
    let slice = |start: usize, end: usize| text[offsets[start]..offsets[end]].to_string();

    if total <= size && total < overlap {
        return vec![Chunk::indexed(document, text.to_string(), 0)];
    }

    let mut chunks = Vec::with_capacity(total / params.stride() + 1);
    let mut start = 0;

    while total - start > size {
        chunks.push(Chunk::indexed(document, slice(start, start + size), chunks.len()));
        start += params.stride();
    }

    // After at least one slide the remainder always exceeds the overlap. The
    // second arm keeps a text of exactly `overlap` characters from vanishing.
    let remaining = total - start;
    if remaining > overlap || (chunks.is_empty() && remaining > 0) {
        chunks.push(Chunk::indexed(document, slice(start, total), chunks.len()));
    }

    chunks
}
