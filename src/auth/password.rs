// Password hashing and verification service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::auth::error::AuthError;

/// Password service for hashing and verification.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a per-call random salt.
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::PasswordHash)?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash.
    ///
    /// A malformed stored hash fails closed: the result is `false`, never an
    /// error in the caller's control flow.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => {
                tracing::warn!("Stored password hash is malformed; failing verification closed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = PasswordService::hash_password("temp-Passw0rd").unwrap();
        assert!(PasswordService::verify_password("temp-Passw0rd", &hash));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = PasswordService::hash_password("correct-password").unwrap();
        assert!(!PasswordService::verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_hash_is_not_plaintext_and_is_salted() {
        let first = PasswordService::hash_password("same-input").unwrap();
        let second = PasswordService::hash_password("same-input").unwrap();
        assert!(!first.contains("same-input"));
        // Embedded random salt: equal plaintexts hash differently.
        assert_ne!(first, second);
        assert!(PasswordService::verify_password("same-input", &first));
        assert!(PasswordService::verify_password("same-input", &second));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!PasswordService::verify_password("anything", "not-a-phc-string"));
        assert!(!PasswordService::verify_password("anything", ""));
        assert!(!PasswordService::verify_password("anything", "$argon2id$corrupted"));
    }
}
