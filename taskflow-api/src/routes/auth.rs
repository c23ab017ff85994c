/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
/// - Token refresh
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Exchange a refresh token for an access token

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskflow_shared::{error::Error, models::User};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    pub password: String,

    /// Display name used when the login creates an account
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens plus the authenticated user
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    /// Access token
    pub token: String,

    /// Refresh token
    pub refresh_token: String,

    pub user: User,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token
    pub token: String,
}

fn auth_payload(state: &AppState, user: User) -> ApiResult<Json<AuthPayload>> {
    let token = state.tokens.issue_access(user.id).map_err(Error::from)?;
    let refresh_token = state.tokens.issue_refresh(user.id).map_err(Error::from)?;

    Ok(Json(AuthPayload {
        token,
        refresh_token,
        user,
    }))
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "secret1",
///   "name": "Jane Doe"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "refresh_token": "eyJ...",
///   "user": { "id": "uuid", "email": "user@example.com", "role": "MEMBER", ... }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthPayload>> {
    req.validate()?;

    let user = state
        .users
        .register(&req.email, &req.password, &req.name)
        .await?;

    auth_payload(&state, user)
}

/// Login endpoint
///
/// With `AUTH_REGISTER_ON_LOGIN` enabled, an unknown email creates the
/// account and logs it in.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthPayload>> {
    req.validate()?;

    let user = state
        .users
        .login(&req.email, &req.password, req.name.as_deref())
        .await?;

    auth_payload(&state, user)
}

/// Token refresh endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token, or an access token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let token = state
        .tokens
        .refresh(&req.refresh_token)
        .map_err(Error::from)?;

    Ok(Json(RefreshResponse { token }))
}
