use crate::error::{EmbeddingError, EmbeddingResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Text-to-vector capability consumed by the store and the pipeline
///
/// Implementations must preserve input order in `embed_batch` and return
/// one vector per text, all of identical dimensionality. A batch call
/// succeeds or fails as a unit; partial results are never surfaced.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed an ordered batch of texts
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let texts = [text.to_string()];
        let mut vectors = self.embed_batch(&texts).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty embedding result".to_string()))
    }
}

/// Connection settings for an OpenAI-compatible embeddings endpoint
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl EmbeddingConfig {
    /// Config with default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read configuration from the process environment
    ///
    /// `OPENAI_API_KEY` is required; `RAGLINE_EMBEDDING_MODEL` and
    /// `RAGLINE_OPENAI_BASE_URL` override the defaults.
    pub fn from_env() -> EmbeddingResult<Self> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            EmbeddingError::Config("OPENAI_API_KEY is not set and no api key was provided".into())
        })?;
        let mut config = Self::new(api_key);
        if let Ok(model) = env::var("RAGLINE_EMBEDDING_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = env::var("RAGLINE_OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

/// Embedding client for an OpenAI-compatible `/v1/embeddings` endpoint
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    config: EmbeddingConfig,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddings {
    #[must_use]
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Client configured from the process environment
    pub fn from_env() -> EmbeddingResult<Self> {
        Ok(Self::new(EmbeddingConfig::from_env()?))
    }

    /// The embedding model requests are issued against
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let url = format!(
            "{}/v1/embeddings",
            self.config.base_url.trim_end_matches('/')
        );
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| EmbeddingError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| EmbeddingError::InvalidResponse(err.to_string()))?;

        if payload.data.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                payload.data.len()
            )));
        }

        // Items carry their input index; order by it before handing the
        // batch back so output position matches input position.
        let mut items = payload.data;
        items.sort_by_key(|item| item.index);
        for (position, item) in items.iter().enumerate() {
            if item.index != position {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "embedding indices do not cover 0..{}",
                    texts.len()
                )));
            }
        }

        let vectors: Vec<Vec<f32>> = items.into_iter().map(|item| item.embedding).collect();

        if let Some(first) = vectors.first() {
            let dimension = first.len();
            if vectors.iter().any(|v| v.len() != dimension) {
                return Err(EmbeddingError::InvalidResponse(
                    "embeddings in one batch differ in dimensionality".to_string(),
                ));
            }
        }

        log::debug!(
            "Embedded {} text(s) with model {}",
            vectors.len(),
            self.config.model
        );
        Ok(vectors)
    }
}

/// Deterministic offline embedding backend
///
/// Produces a hash-seeded unit vector per text: equal texts map to equal
/// vectors, distinct texts almost surely do not. Used in tests and dry
/// runs where no embedding service is reachable.
#[derive(Debug, Clone)]
pub struct StubEmbeddings {
    dimension: usize,
}

impl StubEmbeddings {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// The vector this backend assigns to `text`
    #[must_use]
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        stub_vector(text, self.dimension)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddings {
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| stub_vector(text, self.dimension))
            .collect())
    }
}

fn stub_vector(text: &str, dimension: usize) -> Vec<f32> {
    // xorshift64 seeded from the text hash; zero seeds are not allowed
    let mut state = fnv1a_64(text.as_bytes()) | 1;
    let mut vector: Vec<f32> = (0..dimension)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let unit = (state >> 40) as f32 / (1u64 << 24) as f32;
            unit * 2.0 - 1.0
        })
        .collect();
    normalize(&mut vector);
    vector
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for component in vector.iter_mut() {
            *component /= norm;
        }
    }
}
