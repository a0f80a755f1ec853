/// Unified error handling module
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("External API error: {0}")]
    ExternalApi(#[from] reqwest::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unexpected upstream payload: {0}")]
    UpstreamPayload(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::ExternalApi(e) if e.is_timeout() => (StatusCode::BAD_GATEWAY, "UPSTREAM_TIMEOUT"),
            ApiError::ExternalApi(e) => match e.status().map(|s| s.as_u16()) {
                Some(404) => (StatusCode::NOT_FOUND, "UPSTREAM_404"),
                Some(403) => (StatusCode::BAD_GATEWAY, "UPSTREAM_403"),
                Some(429) => (StatusCode::BAD_GATEWAY, "UPSTREAM_429"),
                Some(500..=599) => (StatusCode::BAD_GATEWAY, "UPSTREAM_5XX"),
                _ => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            },
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            ApiError::UpstreamPayload(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(code, "{}", self);
        }

        let message = match &self {
            ApiError::NotFound(msg) | ApiError::InvalidInput(msg) => msg.clone(),
            ApiError::ExternalApi(_) | ApiError::UpstreamPayload(_) => self.to_string(),
        };

        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
