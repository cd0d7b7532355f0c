//! HTTP surface for FaqRelay
//!
//! Route wiring and JSON request/response shapes for the chat, history,
//! and FAQ admin endpoints. Handlers translate [`RelayError`] variants
//! to status codes; internal error details are logged, never sent to
//! the client.

use crate::error::RelayError;
use crate::service::ChatService;
use crate::storage::{Faq, Message, SqliteStorage};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    /// Conversation orchestrator (exclusive owner of conversation writes)
    pub service: Arc<ChatService>,
    /// Store handle for the read-only and admin FAQ paths
    pub storage: Arc<SqliteStorage>,
}

/// Build the relay router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/history/:user_id", get(history))
        .route("/api/admin/faqs", get(list_faqs))
        .route("/api/admin/upload-faq", post(upload_faq))
        .with_state(state)
}

/// Body of `POST /api/chat`
///
/// Fields are optional so missing keys surface as a 400 validation
/// error rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful reply body of `POST /api/chat`
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Body of `GET /api/history/:userId`
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

/// Body of `POST /api/admin/upload-faq`
#[derive(Debug, Deserialize)]
pub struct UploadFaqRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Error body shared by all endpoints
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a service error to a client response
///
/// Validation and duplicate errors carry user-correctable messages;
/// everything else becomes a generic 500 with the detail logged.
fn error_response(err: anyhow::Error) -> Response {
    match err.downcast_ref::<RelayError>() {
        Some(RelayError::Validation(message)) => {
            json_error(StatusCode::BAD_REQUEST, message.clone())
        }
        Some(RelayError::DuplicateFaq(question)) => {
            tracing::debug!("Rejected duplicate FAQ question: {}", question);
            json_error(StatusCode::CONFLICT, "FAQ question already exists.")
        }
        _ => {
            tracing::error!("Internal error: {}", err);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
        }
    }
}

async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    let (user_id, message) = match (request.user_id, request.message) {
        (Some(user_id), Some(message)) if !user_id.is_empty() && !message.is_empty() => {
            (user_id, message)
        }
        _ => {
            return json_error(StatusCode::BAD_REQUEST, "User ID and message are required.");
        }
    };

    match state.service.handle_message(&user_id, &message).await {
        Ok(response) => (StatusCode::OK, Json(ChatResponse { response })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn history(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    match state.service.history(&user_id) {
        Ok(messages) => (StatusCode::OK, Json(HistoryResponse { messages })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_faqs(State(state): State<AppState>) -> Response {
    match state.storage.list_faqs() {
        Ok(faqs) => (StatusCode::OK, Json(faqs)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn upload_faq(
    State(state): State<AppState>,
    Json(request): Json<UploadFaqRequest>,
) -> Response {
    let (question, answer) = match (request.question, request.answer) {
        (Some(question), Some(answer)) if !question.is_empty() && !answer.is_empty() => {
            (question, answer)
        }
        _ => {
            return json_error(StatusCode::BAD_REQUEST, "Question and answer are required.");
        }
    };

    let faq = Faq::new(question, answer, request.tags);
    match state.storage.insert_faq(&faq) {
        Ok(()) => (StatusCode::CREATED, Json(faq)).into_response(),
        Err(e) => error_response(e),
    }
}
