//! Unified request error handling.
//!
//! All route handlers return `Result<T, ApiError>`. Every failure renders the
//! same JSON body shape:
//!
//! ```json
//! { "error": { "message": "...", "details": { "field": ["..."] } } }
//! ```
//!
//! with `details` present only for validation failures.

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::validation::FieldErrors;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-supplied data failed validation.
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<FieldErrors>,
    },

    /// Referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// A validation failure with a per-field error map.
    #[must_use]
    pub fn validation(details: FieldErrors) -> Self {
        Self::Validation {
            message: "Validation failed".to_string(),
            details: Some(details),
        }
    }

    /// Map a repository error, turning `NotFound` into the given 404 message.
    ///
    /// Keeps the missing-record signal structural: handlers never inspect
    /// driver error codes.
    #[must_use]
    pub fn from_repo(err: RepositoryError, missing: &str) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(missing.to_string()),
            err => Self::Database(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            message: rejection.body_text(),
            details: None,
        }
    }
}

/// JSON extractor that maps body rejections (malformed JSON, wrong
/// content-type) into the uniform error shape instead of axum's plain-text
/// default.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        // Don't expose internal error details to clients
        let (message, details) = match self {
            Self::Validation { message, details } => (message, details),
            Self::NotFound(message) => (message, None),
            Self::Database(_) | Self::Internal(_) => ("Internal server error".to_string(), None),
        };

        let body = ErrorBody {
            error: ErrorDetail { message, details },
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
