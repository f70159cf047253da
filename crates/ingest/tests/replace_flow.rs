//! End-to-end ingestion flows against the shared store handle: wholesale
//! replacement, failure isolation, and key dedup.

use async_trait::async_trait;
use ragline_chunker::{Chunker, ChunkerConfig};
use ragline_ingest::{ActiveStore, IngestError, IngestionPipeline};
use ragline_vector_store::{EmbeddingError, EmbeddingProvider, EmbeddingResult, StubEmbeddings};
use std::sync::Arc;

struct FailingProvider;

#[async_trait]
impl EmbeddingProvider for FailingProvider {
    async fn embed_batch(&self, _texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        Err(EmbeddingError::Api {
            status: 503,
            message: "embedding service down".to_string(),
        })
    }
}

fn pipeline_with(provider: Arc<dyn EmbeddingProvider>) -> IngestionPipeline {
    // Window larger than any test document: one chunk per document, so the
    // full document text is the store key.
    IngestionPipeline::new(
        Chunker::new(ChunkerConfig::new(64, 0)).unwrap(),
        provider,
    )
}

#[tokio::test]
async fn reingestion_replaces_all_previous_content() {
    let active = ActiveStore::new();
    let pipeline = pipeline_with(Arc::new(StubEmbeddings::new(8)));

    let corpus_a = vec!["alpha corpus".to_string()];
    pipeline.ingest_into(&active, &corpus_a).await.unwrap();
    assert!(active.current().retrieve("alpha corpus").is_some());

    let corpus_b = vec!["beta corpus".to_string()];
    pipeline.ingest_into(&active, &corpus_b).await.unwrap();

    let store = active.current();
    assert!(store.retrieve("alpha corpus").is_none());
    assert!(store.retrieve("beta corpus").is_some());

    // No search can surface a corpus-A key either
    let query = StubEmbeddings::new(8).vector_for("alpha corpus");
    let matches = store.search(&query, 10).unwrap();
    assert!(matches.iter().all(|m| m.key != "alpha corpus"));
}

#[tokio::test]
async fn failed_ingestion_leaves_published_store_untouched() {
    let active = ActiveStore::new();

    let good = pipeline_with(Arc::new(StubEmbeddings::new(8)));
    good.ingest_into(&active, &["stable corpus".to_string()])
        .await
        .unwrap();

    let bad = pipeline_with(Arc::new(FailingProvider));
    let err = bad
        .ingest_into(&active, &["doomed corpus".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Embedding(_)));
    assert!(err.is_retryable());

    let store = active.current();
    assert_eq!(store.len(), 1);
    assert!(store.retrieve("stable corpus").is_some());
    assert!(store.retrieve("doomed corpus").is_none());
}

#[tokio::test]
async fn duplicate_chunk_texts_collapse_to_one_record() {
    // Chunk-text-as-key means identical chunks dedup silently; this pins
    // that behavior so changing it is a conscious decision.
    let active = ActiveStore::new();
    let pipeline = pipeline_with(Arc::new(StubEmbeddings::new(8)));

    let documents = vec!["same chunk".to_string(), "same chunk".to_string()];
    let stats = pipeline.ingest_into(&active, &documents).await.unwrap();

    assert_eq!(stats.chunks, 2);
    assert_eq!(stats.stored_records, 1);
    assert_eq!(active.current().len(), 1);
}
