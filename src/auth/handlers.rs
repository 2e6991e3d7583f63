// HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    guard::Identity,
    models::{LoginRequest, LoginResponse, UserResponse},
    repository::UserRepository,
    service::AuthService,
};
use crate::AppState;

/// Login with email and password
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; token carries the user's role", body = LoginResponse),
        (status = 401, description = "Invalid email or password"),
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    request
        .validate()
        .map_err(|_| AuthError::InvalidCredentials)?;

    let service = AuthService::new(UserRepository::new(state.db.clone()), state.tokens.clone());
    let response = service.login(&request.email, &request.password).await?;

    Ok(Json(response))
}

/// Get the current authenticated user
/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_token" = [])),
    tag = "auth"
)]
pub async fn me_handler(identity: Identity) -> Json<UserResponse> {
    Json(UserResponse::from(identity.user))
}
