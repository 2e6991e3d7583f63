// JWT token issuance and validation service

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::error::AuthError;
use crate::auth::models::Role;
use crate::config::AuthConfig;

/// Identity claims embedded in every token.
///
/// The token is self-contained: subject, role, and expiry are signed
/// together, so altering any byte invalidates it. Expiry lives in the token,
/// not server-side.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject: the authenticated principal's email.
    pub sub: String,
    pub role: Role,
    /// Issued-at timestamp (seconds).
    pub iat: i64,
    /// Expiration timestamp (seconds).
    pub exp: i64,
}

/// Why a token failed validation. The guard collapses all variants to 401,
/// but the distinction stays visible for logging and tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token is malformed: {0}")]
    Malformed(String),
}

/// Token service for issuing and validating signed access tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            ttl_secs: config.token_ttl_secs,
        }
    }

    /// Issue a signed token for the given subject and role.
    pub fn issue(&self, email: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Validate signature integrity and expiry, returning the embedded
    /// claims. Any failure yields a typed error, never partial claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test_secret_key_for_testing_purposes".to_string(),
            token_ttl_secs: 3600,
        }
    }

    fn test_token_service() -> TokenService {
        TokenService::new(&test_config())
    }

    #[test]
    fn test_issue_then_validate_returns_original_claims() {
        let service = test_token_service();
        let token = service.issue("ann@example.com", Role::Student).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, "ann@example.com");
        assert_eq!(claims.role, Role::Student);
    }

    #[test]
    fn test_ttl_is_embedded_in_token() {
        let service = test_token_service();
        let token = service.issue("f@example.com", Role::Faculty).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "ann@example.com".to_string(),
            role: Role::Student,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let service = TokenService::new(&config);
        assert_eq!(service.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = test_token_service();
        let token = service.issue("ann@example.com", Role::Student).unwrap();

        // Flip one byte in the payload segment.
        let mut bytes = token.into_bytes();
        let payload_start = bytes.iter().position(|&b| b == b'.').unwrap() + 1;
        bytes[payload_start] = if bytes[payload_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(service.validate(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let service1 = test_token_service();
        let service2 = TokenService::new(&AuthConfig {
            jwt_secret: "another_secret_entirely".to_string(),
            token_ttl_secs: 3600,
        });

        let token = service1.issue("ann@example.com", Role::Admin).unwrap();
        assert!(service1.validate(&token).is_ok());
        assert_eq!(service2.validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();
        for garbage in ["", "not.a.token", "invalid_token_format"] {
            assert!(matches!(
                service.validate(garbage),
                Err(TokenError::Malformed(_))
            ));
        }
    }

    proptest! {
        #[test]
        fn prop_claims_round_trip(
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)",
            role_idx in 0usize..3
        ) {
            let role = [Role::Student, Role::Faculty, Role::Admin][role_idx];
            let service = test_token_service();
            let token = service.issue(&email, role).map_err(|e| {
                TestCaseError::fail(e.to_string())
            })?;
            let claims = service.validate(&token).map_err(|e| {
                TestCaseError::fail(e.to_string())
            })?;

            prop_assert_eq!(claims.sub, email);
            prop_assert_eq!(claims.role, role);
            prop_assert_eq!(claims.exp - claims.iat, 3600);
        }

        #[test]
        fn prop_random_strings_are_rejected(garbage in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.validate(&garbage).is_err());
        }
    }
}
