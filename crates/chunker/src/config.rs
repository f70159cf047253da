use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for character-window chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Window length in characters
    pub chunk_size: usize,

    /// Characters shared between consecutive windows
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkerConfig {
    /// Create a config with explicit window and overlap sizes
    #[must_use]
    pub const fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Distance between consecutive window starts
    ///
    /// Only meaningful for a validated config (`chunk_size > overlap`).
    #[must_use]
    pub const fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size <= self.overlap {
            return Err(ChunkerError::invalid_config(format!(
                "chunk_size ({}) must be greater than overlap ({})",
                self.chunk_size, self.overlap
            )));
        }
        Ok(())
    }
}
