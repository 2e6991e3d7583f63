// Access guard: the single authorization primitive for protected routes.
//
// Resolution runs in three steps: extract and validate the bearer token,
// look up the user behind the token's subject, then (per handler) check the
// resolved role against the allowed set. Handlers compose this extractor
// instead of re-implementing identity or role checks.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::auth::error::AuthError;
use crate::auth::models::{Role, User};
use crate::auth::repository::UserRepository;
use crate::AppState;

/// The authenticated identity resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
}

impl Identity {
    /// Reject unless the identity holds the required role.
    pub fn require(&self, role: Role) -> Result<&User, AuthError> {
        self.require_any(&[role])
    }

    /// Reject unless the identity holds one of the allowed roles.
    pub fn require_any(&self, roles: &[Role]) -> Result<&User, AuthError> {
        if roles.contains(&self.user.role) {
            Ok(&self.user)
        } else {
            Err(AuthError::InsufficientPermissions {
                required: roles.to_vec(),
                actual: self.user.role,
            })
        }
    }
}

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    value.strip_prefix("Bearer ").ok_or(AuthError::InvalidToken)
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Step 1: token integrity and expiry.
        let token = bearer_token(&parts.headers)?;
        let claims = state.tokens.validate(token).map_err(|e| {
            // The reason stays in the logs; callers see one 401 shape.
            debug!("Token validation failed: {}", e);
            match e {
                crate::auth::token::TokenError::Expired => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            }
        })?;

        // Step 2: the subject must resolve to an active user. A valid token
        // for a deleted account is not an identity.
        let user = UserRepository::new(state.db.clone())
            .find_by_email(&claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::UnknownSubject)?;

        debug!("Authenticated {} as {}", user.email, user.role);
        Ok(Identity { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(role: Role) -> User {
        User {
            id: 1,
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_is_missing_token() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_non_bearer_schemes_are_rejected() {
        for value in ["Basic dXNlcjpwYXNz", "token_without_scheme", "bearer lowercase"] {
            let headers = headers_with_auth(value);
            assert!(matches!(
                bearer_token(&headers),
                Err(AuthError::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_require_matching_role() {
        let identity = Identity {
            user: test_user(Role::Admin),
        };
        assert!(identity.require(Role::Admin).is_ok());
    }

    #[test]
    fn test_require_wrong_role_is_forbidden() {
        let identity = Identity {
            user: test_user(Role::Student),
        };
        match identity.require(Role::Admin) {
            Err(AuthError::InsufficientPermissions { required, actual }) => {
                assert_eq!(required, vec![Role::Admin]);
                assert_eq!(actual, Role::Student);
            }
            other => panic!("expected InsufficientPermissions, got {:?}", other),
        }
    }

    #[test]
    fn test_require_any_accepts_any_allowed_role() {
        let identity = Identity {
            user: test_user(Role::Faculty),
        };
        assert!(identity.require_any(&[Role::Admin, Role::Faculty]).is_ok());
        assert!(identity.require_any(&[Role::Student]).is_err());
    }
}
