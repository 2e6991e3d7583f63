// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::models::Role;
use crate::error::ApiError;

/// Authentication and authorization errors.
///
/// Every token-related failure maps to 401 with a message that does not
/// reveal whether the token was malformed, expired, or referenced a user
/// that no longer exists. Role mismatches map to 403.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// Token is valid but its subject does not resolve to an active user.
    /// Indistinguishable from InvalidToken at the HTTP boundary.
    #[error("Invalid token")]
    UnknownSubject,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Insufficient permissions: required role {required:?}")]
    InsufficientPermissions { required: Vec<Role>, actual: Role },

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::UnknownSubject
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::PasswordHash | AuthError::TokenGeneration(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-safe message for this error.
    fn client_message(&self) -> String {
        match self {
            AuthError::MissingToken => "Missing authentication token".to_string(),
            AuthError::InvalidToken | AuthError::UnknownSubject => "Invalid token".to_string(),
            AuthError::ExpiredToken => "Token has expired".to_string(),
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::InsufficientPermissions { required, .. } => {
                let roles: Vec<String> = required.iter().map(|r| r.to_string()).collect();
                format!("Insufficient permissions: required role {}", roles.join(" or "))
            }
            AuthError::PasswordHash | AuthError::TokenGeneration(_) | AuthError::Database(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::UnknownSubject => warn!("Token subject does not resolve to an active user"),
            AuthError::InsufficientPermissions { required, actual } => {
                warn!(
                    "Authorization failed: required {:?}, user has role '{}'",
                    required, actual
                )
            }
            AuthError::PasswordHash => error!("Password hashing error"),
            AuthError::TokenGeneration(msg) => error!("Token generation error: {}", msg),
            AuthError::Database(msg) => error!("Database error in auth: {}", msg),
            AuthError::InvalidCredentials => {}
        }

        let body = Json(json!({ "error": self.client_message() }));
        (self.status_code(), body).into_response()
    }
}

/// Domain handlers compose the guard with `?`, so auth failures fold into
/// the shared error type while keeping their taxonomy.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err.status_code() {
            StatusCode::UNAUTHORIZED => ApiError::Unauthenticated(err.client_message()),
            StatusCode::FORBIDDEN => ApiError::Forbidden(err.client_message()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_are_all_unauthorized() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
            AuthError::UnknownSubject,
            AuthError::InvalidCredentials,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_deleted_user_is_indistinguishable_from_bad_token() {
        assert_eq!(
            AuthError::UnknownSubject.client_message(),
            AuthError::InvalidToken.client_message()
        );
    }

    #[test]
    fn test_role_mismatch_is_forbidden() {
        let err = AuthError::InsufficientPermissions {
            required: vec![Role::Admin],
            actual: Role::Student,
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conversion_to_api_error() {
        assert!(matches!(
            ApiError::from(AuthError::InvalidToken),
            ApiError::Unauthenticated(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::InsufficientPermissions {
                required: vec![Role::Faculty],
                actual: Role::Student,
            }),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::PasswordHash),
            ApiError::Internal(_)
        ));
    }
}
