//! Application error type mapping to HTTP status codes.
//!
//! Errors are returned as `{"error": "<message>"}` JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use mobilia_types::error::RepositoryError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The requested entity does not exist.
    NotFound(String),
    /// The request itself is malformed or out of bounds.
    Validation(String),
    /// Anything the client cannot fix.
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => AppError::NotFound("not found".to_string()),
            RepositoryError::Conflict(msg) => AppError::Validation(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn repository_query_error_maps_to_internal() {
        let err: AppError = RepositoryError::Query("boom".to_string()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn repository_conflict_maps_to_validation() {
        let err: AppError = RepositoryError::Conflict("already reviewed".to_string()).into();
        assert!(matches!(err, AppError::Validation(msg) if msg == "already reviewed"));
    }
}
