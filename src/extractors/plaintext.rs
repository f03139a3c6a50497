//! Plain-text extractor with prioritized encoding fallback.

use std::str;
use std::sync::Arc;

use tracing::debug;

use super::Extractor;
use crate::chunkers::chunk_text;
use crate::error::IngestError;
use crate::types::{Chunk, ChunkingParams, Document};

/// A text encoding the decoder can try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Ascii,
    Utf8,
    Latin1,
}

impl TextEncoding {
    /// Strict decode; `None` if any byte is invalid for this encoding.
    pub fn decode(&self, content: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Ascii => content
                .is_ascii()
                .then(|| content.iter().map(|&b| b as char).collect()),
            TextEncoding::Utf8 => str::from_utf8(content).ok().map(str::to_string),
            // Every byte maps to the code point of the same value
            TextEncoding::Latin1 => Some(content.iter().map(|&b| b as char).collect()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Ascii => "ascii",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }
}

/// Decodes bytes by trying each encoding in order.
#[derive(Debug, Clone)]
pub struct TextDecoder {
    encodings: Vec<TextEncoding>,
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self::new(vec![TextEncoding::Ascii, TextEncoding::Utf8, TextEncoding::Latin1])
    }
}

impl TextDecoder {
    /// Create a decoder trying `encodings` in priority order.
    pub fn new(encodings: Vec<TextEncoding>) -> Self {
        Self { encodings }
    }

    /// Decode with the first encoding that accepts the bytes.
    ///
    /// If none does, falls back to ASCII with every non-ASCII byte dropped.
    /// Returns the text and the name of the encoding used.
    pub fn decode(&self, content: &[u8]) -> (String, &'static str) {
        for encoding in &self.encodings {
            if let Some(text) = encoding.decode(content) {
                return (text, encoding.name());
            }
        }

        let text: String = content
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| b as char)
            .collect();
        (text, "ascii-lossy")
    }
}

/// Extractor for plain text, HTML and anything without a dedicated path.
#[derive(Default)]
pub struct PlainTextExtractor {
    decoder: TextDecoder,
}

impl PlainTextExtractor {
    pub fn new(decoder: TextDecoder) -> Self {
        Self { decoder }
    }

    pub fn decoder(&self) -> &TextDecoder {
        &self.decoder
    }
}

impl Extractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "plain_text"
    }

    fn description(&self) -> &'static str {
        "Decodes bytes with prioritized encodings and windows the text"
    }

    fn extract(
        &self,
        content: &[u8],
        document: &Arc<Document>,
        params: &ChunkingParams,
    ) -> Result<Vec<Chunk>, IngestError> {
        let (text, encoding) = self.decoder.decode(content);
        debug!(file = %document.name, encoding, bytes = content.len(), "Decoded text");
        Ok(chunk_text(&text, document, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_first() {
        let (text, encoding) = TextDecoder::default().decode(b"plain ascii");
        assert_eq!(text, "plain ascii");
        assert_eq!(encoding, "ascii");
    }

    #[test]
    fn test_utf8_second() {
        let (text, encoding) = TextDecoder::default().decode("naïve café".as_bytes());
        assert_eq!(text, "naïve café");
        assert_eq!(encoding, "utf-8");
    }

    #[test]
    fn test_latin1_fallback() {
        // 0xE9 is 'é' in Latin-1 but an invalid lone byte in UTF-8
        let (text, encoding) = TextDecoder::default().decode(b"caf\xE9");
        assert_eq!(text, "café");
        assert_eq!(encoding, "latin-1");
    }

    #[test]
    fn test_lossy_fallback_drops_undecodable_bytes() {
        let decoder = TextDecoder::new(vec![TextEncoding::Ascii, TextEncoding::Utf8]);
        let (text, encoding) = decoder.decode(b"ab\xFFcd");
        assert_eq!(text, "abcd");
        assert_eq!(encoding, "ascii-lossy");
    }

    #[test]
    fn test_extract_chunks_text() {
        let extractor = PlainTextExtractor::default();
        let doc = Arc::new(Document::from_file_name("notes.txt"));
        let params = ChunkingParams::new(10, 0).unwrap();

        let chunks = extractor.extract(b"0123456789abcde", &doc, &params).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "0123456789");
        assert_eq!(chunks[1].content, "abcde");
        assert_eq!(chunks[1].label, "notes.txt chunk 1");
    }
}
