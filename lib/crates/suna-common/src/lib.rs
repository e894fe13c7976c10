pub mod types;

pub use types::{ApiError, ChatRequest, ChatResponse, HealthResponse};
