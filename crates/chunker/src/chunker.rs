use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::types::TextChunk;

/// Splits document text into overlapping character windows
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker with a validated configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this chunker was built with
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split a single text into overlapping chunks
    ///
    /// Chunk starts are `0, step, 2*step, ...` character offsets with
    /// `step = chunk_size - overlap`. The final chunk is truncated at the
    /// end of the text. Empty input yields no chunks.
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        self.split_source(text, 0)
    }

    /// Split each text in order and concatenate the results
    ///
    /// Relative order is preserved and no deduplication happens across
    /// documents; each chunk records the index of the document it came from.
    #[must_use]
    pub fn split_many<S: AsRef<str>>(&self, texts: &[S]) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        for (source, text) in texts.iter().enumerate() {
            chunks.extend(self.split_source(text.as_ref(), source));
        }
        log::debug!(
            "Split {} document(s) into {} chunk(s)",
            texts.len(),
            chunks.len()
        );
        chunks
    }

    fn split_source(&self, text: &str, source: usize) -> Vec<TextChunk> {
        // Window over characters, not bytes: offsets must be stable for
        // multi-byte text.
        let chars: Vec<char> = text.chars().collect();
        let step = self.config.step();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.config.chunk_size).min(chars.len());
            let text: String = chars[start..end].iter().collect();
            chunks.push(TextChunk::new(text, start, source));
            start += step;
        }

        chunks
    }
}
