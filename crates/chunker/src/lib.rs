//! # Ragline Chunker
//!
//! Mechanical character-window splitting of document text.
//!
//! The chunker slices raw text into fixed-size spans with a configurable
//! overlap between consecutive spans. It is deliberately unaware of word or
//! sentence boundaries: chunk starts are exact multiples of
//! `chunk_size - overlap`, which keeps the operation deterministic, O(n),
//! and reproducible across ingestion runs.
//!
//! ```text
//! Document text
//!     │
//!     ├──> window at 0 ──────> "chunk 0" (chunk_size chars)
//!     ├──> window at step ───> "chunk 1"
//!     ├──> window at 2·step ─> "chunk 2"
//!     └──> ...                 last chunk truncated at end of text
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ragline_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig {
//!     chunk_size: 4,
//!     overlap: 1,
//! })
//! .unwrap();
//!
//! let chunks = chunker.split("abcdefghij");
//! assert_eq!(chunks[0].text, "abcd");
//! assert_eq!(chunks[1].start, 3);
//! ```

mod chunker;
mod config;
mod error;
mod types;

pub use chunker::Chunker;
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use types::TextChunk;
