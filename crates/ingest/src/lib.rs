//! # Ragline Ingest
//!
//! Orchestrates document ingestion: chunk, embed in one batch, populate a
//! fresh [`VectorStore`](ragline_vector_store::VectorStore), and publish it
//! atomically.
//!
//! Ingestion is all-or-nothing. The replacement store is built off to the
//! side; any chunking or embedding failure aborts the run and the currently
//! published store is never touched. Readers of [`ActiveStore`] observe
//! either the complete old store or the complete new one. Two racing
//! ingestions resolve by last publish wins.

mod error;
mod handle;
mod pipeline;
mod stats;

pub use error::{IngestError, Result};
pub use handle::ActiveStore;
pub use pipeline::{IngestOutcome, IngestionPipeline};
pub use stats::IngestStats;
