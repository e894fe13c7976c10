use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    /// The fixed payload the mock API reports while it is up.
    #[must_use]
    pub fn ok(version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            version: version.to_string(),
        }
    }
}

/// Body of `POST /api/v1/chat`. The mock server never inspects the
/// message beyond its length, but real clients send this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Canned reply from the mock chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub content: String,
    /// Unix epoch seconds at response time.
    pub timestamp: f64,
}

impl ChatResponse {
    /// Build a reply stamped with the current time.
    #[must_use]
    pub fn canned(id: &str, content: &str) -> Self {
        #[allow(clippy::cast_precision_loss)] // millis since 1970 fit in f64 exactly until ~2255
        let timestamp = Utc::now().timestamp_millis() as f64 / 1000.0;
        Self {
            id: id.to_string(),
            content: content.to_string(),
            timestamp,
        }
    }
}

/// Error body returned for every unknown route or method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            error: "Not found".to_string(),
        }
    }
}
