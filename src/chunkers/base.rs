//! Character-level helpers shared by the chunkers.
//!
//! Chunk sizes are measured in Unicode scalar values, never bytes, so slicing
//! always lands on a char boundary.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `n` characters of `text` (all of it if shorter).
pub fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// `text` without its first `n` characters (empty if shorter).
pub fn skip_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((byte_idx, _)) => &text[byte_idx..],
        None => "",
    }
}

/// Byte offset of every char start in `text`, plus `text.len()` as a sentinel.
///
/// `offsets[i]..offsets[j]` is the byte range of characters `i..j`.
pub fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}
