//! Error types for Restlib server

use axum::{
    http::{header::ETAG, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Machine-readable error codes carried in every error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthorized,
    NotFound,
    ValidationError,
    Conflict,
    PreconditionFailed,
    StorageFailure,
    ServerError,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule rejection: exhausted availability, duplicate username,
    /// double return, duplicate webhook.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// `If-Match` did not match the current representation.
    #[error("Precondition failed: {message}")]
    PreconditionFailed {
        message: String,
        current_etag: String,
        current: serde_json::Value,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_data: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError, msg.clone())
            }
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, ErrorCode::Conflict, msg.clone()),
            AppError::PreconditionFailed { message, .. } => (
                StatusCode::PRECONDITION_FAILED,
                ErrorCode::PreconditionFailed,
                message.clone(),
            ),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "Storage error".to_string(),
                )
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::ServerError,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::ServerError,
                    "Internal server error".to_string(),
                )
            }
        };

        match self {
            AppError::PreconditionFailed {
                current_etag,
                current,
                ..
            } => {
                let etag = HeaderValue::from_str(&current_etag).ok();
                let body = Json(ErrorResponse {
                    success: false,
                    error: code,
                    message,
                    current_etag: Some(current_etag),
                    current_data: Some(current),
                });
                let mut response = (status, body).into_response();
                if let Some(etag) = etag {
                    response.headers_mut().insert(ETAG, etag);
                }
                response
            }
            _ => {
                let body = Json(ErrorResponse {
                    success: false,
                    error: code,
                    message,
                    current_etag: None,
                    current_data: None,
                });
                (status, body).into_response()
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
