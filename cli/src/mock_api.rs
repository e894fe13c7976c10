//! Fixed-route mock of the Suna backend API.
//!
//! Stands in for the real backend during demos: a handful of routes
//! answering with static payloads. No authentication, no persistence,
//! and request logging stays silent.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};

use suna_common::{ApiError, ChatResponse, HealthResponse};

/// Version reported by `/api/health`.
const API_VERSION: &str = "0.1.0";

/// Reply id carried by every canned chat response.
const CHAT_RESPONSE_ID: &str = "mock-response-1";

/// Canned chat reply, mirroring what the full stack would say.
const CHAT_RESPONSE_CONTENT: &str = "هذه استجابة توضيحية من واجهة برمجة التطبيقات المحاكاة. SUNA معد للتشغيل، لكن يجب إعداد بيئة التطوير الكاملة للوصول إلى وظائفه الكاملة.";

/// Build the mock API router.
///
/// Unknown routes and wrong methods on known routes both get the same
/// 404 JSON body.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/v1/chat", post(chat))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
}

async fn index() -> Html<&'static str> {
    Html("<html><body><h1>SUNA Mock API</h1><p>API is running</p></body></html>")
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok(API_VERSION))
}

async fn chat(body: Bytes) -> Json<ChatResponse> {
    // The body is never interpreted; only its size is observed.
    tracing::debug!(request_bytes = body.len(), "chat request");
    Json(ChatResponse::canned(CHAT_RESPONSE_ID, CHAT_RESPONSE_CONTENT))
}

async fn not_found() -> (StatusCode, Json<ApiError>) {
    (StatusCode::NOT_FOUND, Json(ApiError::not_found()))
}
