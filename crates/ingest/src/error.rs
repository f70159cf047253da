use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Chunker error: {0}")]
    Chunker(#[from] ragline_chunker::ChunkerError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] ragline_vector_store::EmbeddingError),
}

impl IngestError {
    /// Whether retrying the same ingestion may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Chunker(_) => false,
            Self::Embedding(err) => err.is_retryable(),
        }
    }
}
