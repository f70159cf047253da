use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

pub type EmbeddingResult<T> = std::result::Result<T, EmbeddingError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Invalid search argument: {0}")]
    InvalidArgument(String),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Failure surfaced by an embedding backend
///
/// Variants distinguish faults the caller can fix by adjusting parameters
/// from transient provider trouble worth retrying upstream. The store never
/// retries on its own.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Client-side configuration problem (missing key, bad endpoint)
    #[error("Embedding configuration error: {0}")]
    Config(String),

    /// The provider rejected or failed the request
    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level failure before a response arrived
    #[error("Embedding transport error: {0}")]
    Transport(String),

    /// The provider answered with something we cannot use
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),
}

impl EmbeddingError {
    /// Whether the caller may reasonably retry the same request
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_) | Self::InvalidResponse(_) => false,
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
        }
    }
}
