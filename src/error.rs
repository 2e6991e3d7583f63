// Error handling for the campus API.
// Centralized error taxonomy and HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Main error type for domain handlers.
///
/// Each variant maps to one status code:
/// - Unauthenticated -> 401 (missing/invalid/expired token, deleted user)
/// - Forbidden -> 403 (valid identity, wrong role or ownership)
/// - NotFound -> 404
/// - Duplicate -> 400 (uniqueness constraint would be violated)
/// - InvalidReference -> 400 (foreign-key input does not resolve)
/// - Validation -> 400
/// - Database / Internal -> 500, fatal to the request only
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: String },

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    InvalidReference(String),

    #[error("request validation failed")]
    Validation(validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for a NotFound with a numeric id.
    pub fn not_found(resource: &str, id: i32) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Translate a storage error from an insert, mapping a unique-constraint
    /// violation to a descriptive Duplicate error.
    pub fn from_db(error: sqlx::Error, duplicate_message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() {
                return ApiError::Duplicate(duplicate_message.to_string());
            }
        }
        ApiError::Database(error)
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Duplicate(_)
            | ApiError::InvalidReference(_)
            | ApiError::Validation(_)
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let (error_code, message, details) = match self {
            ApiError::Unauthenticated(msg) => {
                warn!("Unauthenticated request: {}", msg);
                ("UNAUTHENTICATED", msg.clone(), None)
            }
            ApiError::Forbidden(msg) => {
                warn!("Forbidden request: {}", msg);
                ("FORBIDDEN", msg.clone(), None)
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                ("NOT_FOUND", self.to_string(), None)
            }
            ApiError::Duplicate(msg) => {
                warn!("Duplicate: {}", msg);
                ("DUPLICATE", msg.clone(), None)
            }
            ApiError::InvalidReference(msg) => {
                debug!("Invalid reference: {}", msg);
                ("INVALID_REFERENCE", msg.clone(), None)
            }
            ApiError::Validation(errors) => {
                debug!("Validation error: {:?}", errors);
                (
                    "VALIDATION_ERROR",
                    "Request validation failed".to_string(),
                    Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
                )
            }
            ApiError::BadRequest(msg) => {
                debug!("Bad request: {}", msg);
                ("VALIDATION_ERROR", msg.clone(), None)
            }
            ApiError::Database(db_error) => {
                // Full error stays in the logs; clients get a generic message.
                error!("Database error: {:?}", db_error);
                ("DATABASE_ERROR", "A database error occurred".to_string(), None)
            }
            ApiError::Internal(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        (
            self.status_code(),
            ErrorResponse {
                error_code: error_code.to_string(),
                message,
                details,
                timestamp: Utc::now().to_rfc3339(),
            },
        )
    }
}

/// Consistent JSON error envelope for all error responses.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "DUPLICATE", "NOT_FOUND")
    pub error_code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (e.g. field-level validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::Unauthenticated("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("wrong role".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("Course", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        // Duplicates surface as 400 with a descriptive message, not 409.
        assert_eq!(
            ApiError::Duplicate("enrollment already exists".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidReference("invalid course id".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::not_found("Student", 42);
        assert_eq!(err.to_string(), "Student with id 42 not found");
    }

    #[test]
    fn test_database_error_is_not_exposed() {
        let err = ApiError::Database(sqlx::Error::PoolTimedOut);
        let (status, response) = err.to_error_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error_code, "DATABASE_ERROR");
        assert!(!response.message.to_lowercase().contains("pool"));
    }

    #[test]
    fn test_from_db_passes_through_other_errors() {
        let err = ApiError::from_db(sqlx::Error::RowNotFound, "already exists");
        assert!(matches!(err, ApiError::Database(_)));
    }
}
