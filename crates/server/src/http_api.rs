use crate::chat::{ChatClient, ChatError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use ragline_ingest::{ActiveStore, IngestStats, IngestionPipeline};
use ragline_retrieval::{build_messages, ChatMessage, ContextBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state behind every request handler
pub struct AppState {
    pub active: ActiveStore,
    pub pipeline: IngestionPipeline,
    pub builder: ContextBuilder,
    pub chat: ChatClient,
}

/// Build the API router
///
/// CORS is wide open: the API serves browser frontends on other origins.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/ingest", post(ingest))
        .route("/api/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub current_user_message: String,

    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,

    #[serde(default = "default_system_message")]
    pub system_message: String,
}

fn default_system_message() -> String {
    "You are a helpful assistant.".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,

    /// Whether retrieved context made it into the system prompt
    pub augmented: bool,
}

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub documents: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub indexed_records: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub retryable: bool,
}

type ApiError = (StatusCode, Json<ErrorBody>);

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let store = state.active.current();
    let prompt = state
        .builder
        .build_system_message(
            &request.system_message,
            &request.current_user_message,
            &store,
        )
        .await;
    let augmented = prompt.was_augmented();

    let messages = build_messages(
        prompt.into_text(),
        &request.conversation_history,
        request.current_user_message,
    );

    match state.chat.complete(&messages).await {
        Ok(message) => Ok(Json(ChatResponse { message, augmented })),
        Err(err) => {
            log::error!("Chat completion failed: {err}");
            Err(chat_error(&err))
        }
    }
}

async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestStats>, ApiError> {
    match state
        .pipeline
        .ingest_into(&state.active, &request.documents)
        .await
    {
        Ok(stats) => Ok(Json(stats)),
        Err(err) => {
            log::error!("Ingestion failed: {err}");
            let status = if err.is_retryable() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            Err((
                status,
                Json(ErrorBody {
                    error: err.to_string(),
                    retryable: err.is_retryable(),
                }),
            ))
        }
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        indexed_records: state.active.current().len(),
    })
}

fn chat_error(err: &ChatError) -> ApiError {
    let status = match err {
        ChatError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
            retryable: err.is_retryable(),
        }),
    )
}
