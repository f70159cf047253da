use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, VectorStoreError};
use crate::types::{SearchMatch, VectorRecord};
use std::collections::HashMap;

/// In-memory keyed vector store with exact ranked search
///
/// Records live in a `Vec` in insertion order with a key index alongside.
/// The order matters: equal similarity scores rank earliest-inserted first,
/// and overwriting an existing key keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    records: Vec<VectorRecord>,
    index: HashMap<String, usize>,
}

impl VectorStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the vector for `key`
    ///
    /// Last write wins; an overwritten key keeps its insertion position.
    pub fn insert(&mut self, key: impl Into<String>, vector: Vec<f32>) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&slot) => {
                self.records[slot].vector = vector;
            }
            None => {
                self.index.insert(key.clone(), self.records.len());
                self.records.push(VectorRecord { key, vector });
            }
        }
    }

    /// Return the stored vector for `key`, if any
    #[must_use]
    pub fn retrieve(&self, key: &str) -> Option<&[f32]> {
        self.index
            .get(key)
            .map(|&slot| self.records[slot].vector.as_slice())
    }

    /// Rank all stored vectors against `query` by cosine similarity
    ///
    /// Returns at most `min(k, len)` matches, scores non-increasing. An
    /// empty store yields an empty result for any `k`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchMatch>> {
        self.search_with(query, k, cosine_similarity)
    }

    /// Rank all stored vectors against `query` with a caller-supplied score
    pub fn search_with<F>(&self, query: &[f32], k: usize, score_fn: F) -> Result<Vec<SearchMatch>>
    where
        F: Fn(&[f32], &[f32]) -> f32,
    {
        if k == 0 {
            return Err(VectorStoreError::InvalidArgument(
                "k must be a positive integer".to_string(),
            ));
        }

        let mut matches: Vec<SearchMatch> = self
            .records
            .iter()
            .map(|record| SearchMatch {
                key: record.key.clone(),
                score: score_fn(query, &record.vector),
            })
            .collect();

        // Stable sort over insertion order: ties keep the earliest-inserted
        // record first.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(k);

        log::debug!("Search over {} record(s), top {}", self.records.len(), k);
        Ok(matches)
    }

    /// Embed `query_text` with `provider`, then search
    ///
    /// Embedding failures propagate unchanged.
    pub async fn search_by_text(
        &self,
        provider: &dyn EmbeddingProvider,
        query_text: &str,
        k: usize,
    ) -> Result<Vec<SearchMatch>> {
        let query = provider.embed(query_text).await?;
        self.search(&query, k)
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.key.as_str())
    }

    /// Dimensionality of the stored vectors
    ///
    /// Taken from the first record; by invariant every record in a store
    /// shares it. `None` for an empty store.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.records.first().map(|record| record.vector.len())
    }
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 (not an error, not NaN) when either vector has zero norm or
/// the lengths differ, so a degenerate embedding never poisons ranking.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::StubEmbeddings;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_retrieve_round_trip() {
        let mut store = VectorStore::new();
        store.insert("alpha", vec![0.1, 0.2, 0.3]);

        assert_eq!(store.retrieve("alpha"), Some(&[0.1, 0.2, 0.3][..]));
        assert_eq!(store.retrieve("missing"), None);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut store = VectorStore::new();
        store.insert("a", vec![1.0, 0.0]);
        store.insert("b", vec![1.0, 0.0]);
        store.insert("a", vec![0.0, 1.0]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.retrieve("a"), Some(&[0.0, 1.0][..]));
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_search_ranked_descending() {
        let mut store = VectorStore::new();
        store.insert("east", vec![1.0, 0.0]);
        store.insert("north", vec![0.0, 1.0]);
        store.insert("northeast", vec![1.0, 1.0]);

        let matches = store.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(matches[0].key, "east");
        assert_eq!(matches[1].key, "northeast");
        assert_eq!(matches[2].key, "north");
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_search_truncates_to_k() {
        let mut store = VectorStore::new();
        for i in 0..10 {
            store.insert(format!("key-{i}"), vec![i as f32, 1.0]);
        }

        assert_eq!(store.search(&[1.0, 1.0], 3).unwrap().len(), 3);
        // k larger than the store is fine
        assert_eq!(store.search(&[1.0, 1.0], 50).unwrap().len(), 10);
    }

    #[test]
    fn test_search_zero_k_rejected() {
        let store = VectorStore::new();
        assert!(matches!(
            store.search(&[1.0], 0),
            Err(VectorStoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_store_yields_empty_result() {
        let store = VectorStore::new();
        assert!(store.search(&[1.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_equal_scores_keep_insertion_order() {
        let v = vec![0.5, 0.5];
        let mut store = VectorStore::new();
        store.insert("x", v.clone());
        store.insert("y", v.clone());

        let matches = store.search(&v, 2).unwrap();
        assert_eq!(matches[0].key, "x");
        assert_eq!(matches[1].key, "y");
        assert_eq!(matches[0].score, matches[1].score);
    }

    #[test]
    fn test_dimension_reported() {
        let mut store = VectorStore::new();
        assert_eq!(store.dimension(), None);
        store.insert("a", vec![0.0; 8]);
        assert_eq!(store.dimension(), Some(8));
    }

    #[test]
    fn test_cosine_identical_vector_is_one() {
        let v = [0.3, -0.7, 0.2];
        let score = cosine_similarity(&v, &v);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(score.abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_search_by_text_exact_match_ranks_first() {
        let provider = StubEmbeddings::new(32);
        let mut store = VectorStore::new();
        store.insert("a", provider.vector_for("a"));
        store.insert("b", provider.vector_for("b"));

        let matches = store.search_by_text(&provider, "a", 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].key, "a");
        assert!((matches[0].score - 1.0).abs() < 1e-5);
        assert!(matches[1].score < matches[0].score);
    }
}
