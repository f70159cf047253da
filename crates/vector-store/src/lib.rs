//! # Ragline Vector Store
//!
//! In-memory vector storage with exact ranked similarity search, plus the
//! embedding capability the rest of the pipeline consumes.
//!
//! ## Architecture
//!
//! ```text
//! Chunk text
//!     │
//!     ├──> EmbeddingProvider (OpenAI-compatible API or stub)
//!     │      └─> Vec<f32>, one per text, order-preserving
//!     │
//!     └──> VectorStore
//!            ├─> insert: keyed records in insertion order
//!            └─> search: linear scan + stable descending sort by score
//! ```
//!
//! Search is an exact linear scan; at the target corpus size an index would
//! cost more than it saves. Equal scores rank by insertion order, which
//! keeps result ordering reproducible across runs.
//!
//! ## Example
//!
//! ```rust
//! use ragline_vector_store::VectorStore;
//!
//! let mut store = VectorStore::new();
//! store.insert("the cat sat", vec![1.0, 0.0]);
//! store.insert("the dog ran", vec![0.0, 1.0]);
//!
//! let matches = store.search(&[1.0, 0.0], 1).unwrap();
//! assert_eq!(matches[0].key, "the cat sat");
//! ```

mod embeddings;
mod error;
mod store;
mod types;

pub use embeddings::{EmbeddingConfig, EmbeddingProvider, OpenAiEmbeddings, StubEmbeddings};
pub use error::{EmbeddingError, EmbeddingResult, Result, VectorStoreError};
pub use store::{cosine_similarity, VectorStore};
pub use types::{SearchMatch, VectorRecord};
