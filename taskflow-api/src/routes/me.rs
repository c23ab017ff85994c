/// Current user endpoints
///
/// - `GET /v1/me` - The authenticated user
/// - `PATCH /v1/me` - Partial profile update

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Deserialize;
use taskflow_shared::{
    auth::{authorization::require_user, middleware::AuthContext},
    models::User,
    services::users::ProfileChanges,
};
use validator::Validate;

/// Profile update request; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: Option<String>,

    #[validate(length(max = 512, message = "Avatar must be at most 512 characters"))]
    pub avatar: Option<String>,
}

pub async fn get_me(auth: AuthContext) -> ApiResult<Json<User>> {
    Ok(Json(require_user(&auth)?.clone()))
}

/// # Errors
///
/// - `400 Bad Request`: Malformed name or email, or email already registered
/// - `401 Unauthorized`: No identity
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let user = require_user(&auth)?;
    req.validate()?;

    let updated = state
        .users
        .update_profile(
            user.id,
            ProfileChanges {
                name: req.name,
                email: req.email,
                avatar: req.avatar,
            },
        )
        .await?;

    Ok(Json(updated))
}
