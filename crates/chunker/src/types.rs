use serde::{Deserialize, Serialize};

/// A contiguous text span cut from a source document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextChunk {
    /// The chunk content
    pub text: String,

    /// Start offset in the source document, in characters
    pub start: usize,

    /// Index of the source document within the ingested batch
    pub source: usize,
}

impl TextChunk {
    /// Create a new chunk
    #[must_use]
    pub const fn new(text: String, start: usize, source: usize) -> Self {
        Self {
            text,
            start,
            source,
        }
    }

    /// Chunk length in characters (not bytes)
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// End offset in the source document, in characters (exclusive)
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.char_len()
    }
}
