use serde::Serialize;

/// Summary of one ingestion run
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IngestStats {
    /// Documents received
    pub documents: usize,

    /// Chunks produced by the splitter
    pub chunks: usize,

    /// Records in the resulting store
    ///
    /// Lower than `chunks` exactly when duplicate chunk texts collapsed
    /// onto one key.
    pub stored_records: usize,

    /// Vector dimensionality of the stored records
    pub dimension: Option<usize>,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl IngestStats {
    /// Chunks that collapsed onto an existing key during this run
    #[must_use]
    pub const fn deduplicated(&self) -> usize {
        self.chunks - self.stored_records
    }
}
