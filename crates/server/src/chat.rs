use futures_util::{stream, Stream, StreamExt};
use ragline_retrieval::ChatMessage;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub type ChatResult<T> = std::result::Result<T, ChatError>;

/// Failure from the chat completion collaborator
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Chat configuration error: {0}")]
    Config(String),

    #[error("Chat API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Chat transport error: {0}")]
    Transport(String),

    #[error("Invalid chat response: {0}")]
    InvalidResponse(String),
}

impl ChatError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_) | Self::InvalidResponse(_) => false,
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// Connection settings for an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl ChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read configuration from the process environment
    ///
    /// `OPENAI_API_KEY` is required; `RAGLINE_CHAT_MODEL` and
    /// `RAGLINE_OPENAI_BASE_URL` override the defaults.
    pub fn from_env() -> ChatResult<Self> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            ChatError::Config("OPENAI_API_KEY is not set and no api key was provided".into())
        })?;
        let mut config = Self::new(api_key);
        if let Ok(model) = env::var("RAGLINE_CHAT_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = env::var("RAGLINE_OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

/// Thin client for an OpenAI-compatible `/v1/chat/completions` endpoint
pub struct ChatClient {
    client: reqwest::Client,
    config: ChatConfig,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    content: Option<String>,
}

impl ChatClient {
    #[must_use]
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> ChatResult<Self> {
        Ok(Self::new(ChatConfig::from_env()?))
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Run a completion and return the full response text
    pub async fn complete(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        let response = self.send(messages, None).await?;
        let payload: CompletionResponse = response
            .json()
            .await
            .map_err(|err| ChatError::InvalidResponse(err.to_string()))?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ChatError::InvalidResponse("completion has no content".to_string()))
    }

    /// Run a streaming completion, yielding content fragments as they arrive
    ///
    /// The stream is finite and cannot be restarted; it ends at the
    /// `[DONE]` sentinel or the first error.
    pub async fn stream(
        &self,
        messages: &[ChatMessage],
    ) -> ChatResult<impl Stream<Item = ChatResult<String>>> {
        let response = self.send(messages, Some(true)).await?;
        Ok(sse_deltas(Box::pin(response.bytes_stream())))
    }

    async fn send(
        &self,
        messages: &[ChatMessage],
        stream: Option<bool>,
    ) -> ChatResult<reqwest::Response> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            stream,
        };

        log::debug!(
            "Chat completion with model {} ({} message(s))",
            self.config.model,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ChatError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

/// Decode `data:` SSE lines from a byte stream into content deltas
fn sse_deltas<S, B>(bytes: S) -> impl Stream<Item = ChatResult<String>>
where
    S: Stream<Item = reqwest::Result<B>> + Unpin,
    B: AsRef<[u8]>,
{
    // The source is dropped after the first error or the [DONE] sentinel,
    // so the stream is fused: nothing more is yielded afterwards.
    stream::unfold(
        (Some(bytes), String::new()),
        |(bytes, mut buffer)| async move {
            let mut bytes = bytes?;
            loop {
                if let Some(pos) = buffer.find('\n') {
                    let line: String = buffer.drain(..=pos).collect();
                    let Some(data) = line.trim().strip_prefix("data:") else {
                        continue;
                    };
                    let data = data.trim();
                    if data == "[DONE]" {
                        return None;
                    }
                    match serde_json::from_str::<StreamChunk>(data) {
                        Ok(chunk) => {
                            let content = chunk
                                .choices
                                .into_iter()
                                .next()
                                .and_then(|choice| choice.delta.content);
                            match content {
                                Some(content) if !content.is_empty() => {
                                    return Some((Ok(content), (Some(bytes), buffer)));
                                }
                                _ => continue,
                            }
                        }
                        Err(err) => {
                            return Some((
                                Err(ChatError::InvalidResponse(err.to_string())),
                                (None, buffer),
                            ));
                        }
                    }
                }

                match bytes.next().await {
                    Some(Ok(chunk)) => {
                        buffer.push_str(&String::from_utf8_lossy(chunk.as_ref()));
                    }
                    Some(Err(err)) => {
                        return Some((
                            Err(ChatError::Transport(err.to_string())),
                            (None, buffer),
                        ));
                    }
                    None => return None,
                }
            }
        },
    )
}
