use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::llm::LlmError;
use crate::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("service unavailable")]
    ServiceUnavailable,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upstream timeout")]
    GatewayTimeout,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::GatewayTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Upstream service timed out".to_string(),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Pipeline failures map to generic transport errors; the cause goes to the
/// logs, not the response body.
impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        tracing::error!("pipeline error: {}", err);
        match err {
            PipelineError::UpstreamTimeout(_) => ApiError::GatewayTimeout,
            _ => ApiError::Internal("AI generation failed".to_string()),
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        tracing::error!("llm error: {}", err);
        match err {
            LlmError::Timeout => ApiError::GatewayTimeout,
            _ => ApiError::Internal("AI generation failed".to_string()),
        }
    }
}
