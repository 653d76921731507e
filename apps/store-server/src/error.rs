//! # API Error Type
//!
//! What HTTP clients receive when a request fails.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cause                          Status   Body                           │
//! │  ─────────────────────────────  ──────   ─────────────────────────────  │
//! │  unknown section in the path    404      code NOT_FOUND                 │
//! │  body missing or wrong shape    400      code VALIDATION_ERROR          │
//! │  DbError                        500      code DATABASE_ERROR            │
//! │                                                                         │
//! │  { "error": "Failed to update papers",                                  │
//! │    "details": "Query failed: database is locked",                       │
//! │    "code": "DATABASE_ERROR" }                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use devis_core::wire::ErrorBody;
use devis_db::DbError;

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown section (404)
    NotFound,

    /// Request body rejected (400)
    ValidationError,

    /// Store operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    /// HTTP status answered for this code.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
        }
    }
}

/// API error returned from route handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// What the request was trying to do, e.g. "Failed to fetch data"
    pub error: String,

    /// Underlying cause
    pub details: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, error: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError {
            code,
            error: error.into(),
            details: details.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(error: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, error, details)
    }

    /// Creates a validation error.
    pub fn validation(error: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, error, details)
    }

    /// Wraps a store failure under a description of the failed request.
    pub fn database(error: impl Into<String>, err: DbError) -> Self {
        let error = error.into();
        tracing::error!(error = %error, cause = %err, "Store operation failed");
        ApiError::new(ErrorCode::DatabaseError, error, err.to_string())
    }

    /// The JSON body sent to the client.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.error.clone(),
            details: self.details.clone(),
            code: Some(self.code.as_str().to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}: {}", self.code, self.error, self.details)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self.body())).into_response()
    }
}
