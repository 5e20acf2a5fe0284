//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from the storage, chain and access crates to HTTP
//! status codes with JSON bodies of the form
//! `{"error": {"code": ..., "message": ...}}`.
//! Upstream and internal failure details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Error detail.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Operation not supported by the configured backend (501).
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A dependency (storage network, fullnode) failed (502).
    /// Message is logged but not returned to client.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::NotImplemented(_) => (StatusCode::NOT_IMPLEMENTED, "NOT_IMPLEMENTED"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Upstream(_) => "An upstream service failed".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) => tracing::warn!(error = %self, "upstream failure"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<wm_core::ValidationError> for AppError {
    fn from(err: wm_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<wm_walrus::StorageError> for AppError {
    fn from(err: wm_walrus::StorageError) -> Self {
        use wm_walrus::StorageError;
        match err {
            StorageError::NotFound(id) => Self::NotFound(format!("blob {id}")),
            StorageError::NotImplemented(op) => {
                Self::NotImplemented(format!("{op} is not supported by the configured store"))
            }
            StorageError::Config(e) => Self::Internal(e.to_string()),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<wm_sui::SuiRpcError> for AppError {
    fn from(err: wm_sui::SuiRpcError) -> Self {
        match err {
            wm_sui::SuiRpcError::Config(e) => Self::Internal(e.to_string()),
            other => Self::Upstream(other.to_string()),
        }
    }
}
