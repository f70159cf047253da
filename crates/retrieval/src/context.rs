use ragline_vector_store::{EmbeddingProvider, VectorStore, VectorStoreError};
use std::sync::Arc;

const DEFAULT_TOP_K: usize = 5;

const DEFAULT_INSTRUCTIONS: &str = "Use the retrieved context below to answer the user. \
Ground your answer in that context; if it does not cover the question, say you do not know \
rather than guessing.";

/// Retrieval settings for prompt augmentation
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Matches to fold into the prompt
    pub top_k: usize,

    /// Instructional text placed between the base message and the context
    pub instructions: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }
}

/// Outcome of prompt augmentation
///
/// `Fallback` is the visible degradation branch: the chat turn proceeds
/// with the base message and the reason records why no context was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AugmentedPrompt {
    /// Base message with retrieved context folded in
    Augmented(String),

    /// Base message unchanged
    Fallback {
        base: String,
        reason: FallbackReason,
    },
}

impl AugmentedPrompt {
    /// The system message to send, whichever branch was taken
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Augmented(text) => text,
            Self::Fallback { base, .. } => base,
        }
    }

    #[must_use]
    pub const fn was_augmented(&self) -> bool {
        matches!(self, Self::Augmented(_))
    }

    #[must_use]
    pub const fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Augmented(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Why augmentation fell back to the base message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Nothing has been ingested yet
    EmptyStore,

    /// The search ran but returned no matches
    NoMatches,

    /// The embedding collaborator failed
    Embedding(String),

    /// The search itself failed
    Search(String),
}

/// Builds retrieval-augmented system prompts
pub struct ContextBuilder {
    provider: Arc<dyn EmbeddingProvider>,
    config: RetrievalConfig,
}

impl ContextBuilder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_config(provider, RetrievalConfig::default())
    }

    pub fn with_config(provider: Arc<dyn EmbeddingProvider>, config: RetrievalConfig) -> Self {
        Self { provider, config }
    }

    /// Augment `base` with the chunks most relevant to `user_text`
    ///
    /// Never fails: any trouble on the retrieval path is logged and folded
    /// into [`AugmentedPrompt::Fallback`].
    pub async fn build_system_message(
        &self,
        base: &str,
        user_text: &str,
        store: &VectorStore,
    ) -> AugmentedPrompt {
        if store.is_empty() {
            return self.fallback(base, FallbackReason::EmptyStore);
        }

        let matches = match store
            .search_by_text(self.provider.as_ref(), user_text, self.config.top_k)
            .await
        {
            Ok(matches) => matches,
            Err(VectorStoreError::Embedding(err)) => {
                log::warn!("Prompt augmentation skipped, embedding failed: {err}");
                return self.fallback(base, FallbackReason::Embedding(err.to_string()));
            }
            Err(err) => {
                log::warn!("Prompt augmentation skipped, search failed: {err}");
                return self.fallback(base, FallbackReason::Search(err.to_string()));
            }
        };

        if matches.is_empty() {
            return self.fallback(base, FallbackReason::NoMatches);
        }

        let context = matches
            .iter()
            .map(|m| m.key.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        log::debug!("Augmented prompt with {} chunk(s)", matches.len());
        AugmentedPrompt::Augmented(format!(
            "{base}\n\n{instructions}\n\nContext:\n{context}",
            instructions = self.config.instructions
        ))
    }

    fn fallback(&self, base: &str, reason: FallbackReason) -> AugmentedPrompt {
        AugmentedPrompt::Fallback {
            base: base.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use ragline_vector_store::{EmbeddingError, EmbeddingResult, StubEmbeddings};

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        async fn embed_batch(&self, _texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
            Err(EmbeddingError::Transport("connection refused".to_string()))
        }
    }

    fn populated_store(provider: &StubEmbeddings, texts: &[&str]) -> VectorStore {
        let mut store = VectorStore::new();
        for text in texts {
            store.insert(*text, provider.vector_for(text));
        }
        store
    }

    #[tokio::test]
    async fn test_empty_store_falls_back_unchanged() {
        let builder = ContextBuilder::new(Arc::new(StubEmbeddings::new(8)));
        let prompt = builder
            .build_system_message("base prompt", "anything", &VectorStore::new())
            .await;

        assert_eq!(
            prompt.fallback_reason(),
            Some(&FallbackReason::EmptyStore)
        );
        assert_eq!(prompt.into_text(), "base prompt");
    }

    #[tokio::test]
    async fn test_augmented_prompt_contains_ranked_context() {
        let provider = StubEmbeddings::new(32);
        let store = populated_store(&provider, &["first fact", "second fact"]);
        let builder = ContextBuilder::new(Arc::new(provider));

        let prompt = builder
            .build_system_message("You are helpful.", "first fact", &store)
            .await;

        assert!(prompt.was_augmented());
        let text = prompt.into_text();
        assert!(text.starts_with("You are helpful."));
        // Exact match ranks first, so it appears before the other chunk
        let first = text.find("first fact").unwrap();
        let second = text.find("second fact").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_embedding_failure_falls_back() {
        let stub = StubEmbeddings::new(8);
        let store = populated_store(&stub, &["a fact"]);
        let builder = ContextBuilder::new(Arc::new(FailingProvider));

        let prompt = builder
            .build_system_message("base prompt", "question", &store)
            .await;

        assert!(!prompt.was_augmented());
        assert!(matches!(
            prompt.fallback_reason(),
            Some(FallbackReason::Embedding(_))
        ));
        assert_eq!(prompt.into_text(), "base prompt");
    }

    #[tokio::test]
    async fn test_zero_top_k_falls_back_via_search_error() {
        let provider = StubEmbeddings::new(8);
        let store = populated_store(&provider, &["a fact"]);
        let builder = ContextBuilder::with_config(
            Arc::new(provider),
            RetrievalConfig {
                top_k: 0,
                ..Default::default()
            },
        );

        let prompt = builder
            .build_system_message("base prompt", "question", &store)
            .await;

        assert!(matches!(
            prompt.fallback_reason(),
            Some(FallbackReason::Search(_))
        ));
        assert_eq!(prompt.into_text(), "base prompt");
    }

    #[tokio::test]
    async fn test_top_k_limits_context_size() {
        let provider = StubEmbeddings::new(32);
        let texts: Vec<String> = (0..10).map(|i| format!("fact number {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let store = populated_store(&provider, &refs);
        let builder = ContextBuilder::new(Arc::new(provider));

        let prompt = builder
            .build_system_message("base", "fact number 3", &store)
            .await;

        let text = prompt.into_text();
        let folded = texts.iter().filter(|t| text.contains(t.as_str())).count();
        assert_eq!(folded, 5);
    }
}
