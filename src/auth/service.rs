// Authentication service - business logic layer

use crate::auth::{
    error::AuthError,
    models::{LoginResponse, UserResponse},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};

/// Authentication service coordinating credential checks and token issuance.
pub struct AuthService {
    user_repo: UserRepository,
    token_service: TokenService,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, token_service: TokenService) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown email, wrong password, and deactivated account all produce
    /// the same InvalidCredentials result.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_service.issue(&user.email, user.role)?;
        tracing::info!("User {} logged in with role {}", user.email, user.role);

        Ok(LoginResponse {
            token,
            role: user.role,
            user: UserResponse::from(user),
        })
    }
}
