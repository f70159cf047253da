use crate::error::Result;
use crate::handle::ActiveStore;
use crate::stats::IngestStats;
use ragline_chunker::Chunker;
use ragline_vector_store::{EmbeddingError, EmbeddingProvider, VectorStore};
use std::sync::Arc;
use std::time::Instant;

/// Chunks documents, embeds them in one batch, and builds a fresh store
pub struct IngestionPipeline {
    chunker: Chunker,
    provider: Arc<dyn EmbeddingProvider>,
}

/// Result of a successful ingestion: the new store plus run statistics
pub struct IngestOutcome {
    pub store: VectorStore,
    pub stats: IngestStats,
}

impl IngestionPipeline {
    pub fn new(chunker: Chunker, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { chunker, provider }
    }

    /// Ingest a document batch into a brand-new store
    ///
    /// Chunk texts become store keys, so identical chunks collapse onto one
    /// record (last vector wins). On any failure nothing is produced; the
    /// caller's currently published store is untouched either way.
    pub async fn ingest(&self, documents: &[String]) -> Result<IngestOutcome> {
        let started = Instant::now();
        let chunks = self.chunker.split_many(documents);
        let mut store = VectorStore::new();

        if chunks.is_empty() {
            log::info!(
                "Ingestion produced no chunks from {} document(s)",
                documents.len()
            );
            return Ok(IngestOutcome {
                stats: IngestStats {
                    documents: documents.len(),
                    chunks: 0,
                    stored_records: 0,
                    dimension: None,
                    elapsed_ms: elapsed_ms(started),
                },
                store,
            });
        }

        let texts: Vec<String> = chunks.into_iter().map(|chunk| chunk.text).collect();
        let chunk_count = texts.len();
        let vectors = self.provider.embed_batch(&texts).await?;
        if vectors.len() != chunk_count {
            return Err(EmbeddingError::InvalidResponse(format!(
                "provider returned {} vectors for {} chunks",
                vectors.len(),
                chunk_count
            ))
            .into());
        }

        for (text, vector) in texts.into_iter().zip(vectors) {
            store.insert(text, vector);
        }

        let stats = IngestStats {
            documents: documents.len(),
            chunks: chunk_count,
            stored_records: store.len(),
            dimension: store.dimension(),
            elapsed_ms: elapsed_ms(started),
        };
        log::info!(
            "Ingested {} document(s): {} chunk(s), {} record(s) in {}ms",
            stats.documents,
            stats.chunks,
            stats.stored_records,
            stats.elapsed_ms
        );

        Ok(IngestOutcome { store, stats })
    }

    /// Ingest and, only on success, publish the new store
    pub async fn ingest_into(
        &self,
        active: &ActiveStore,
        documents: &[String],
    ) -> Result<IngestStats> {
        let outcome = self.ingest(documents).await?;
        active.publish(outcome.store);
        Ok(outcome.stats)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
