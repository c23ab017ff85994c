/// Notification endpoints
///
/// - `GET  /v1/notifications` - The caller's notifications, newest first
/// - `POST /v1/notifications/:id/read` - Mark one as read
///
/// A notification owned by another user reads as `404`.

use super::Ack;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use taskflow_shared::{
    auth::{authorization::require_user, middleware::AuthContext},
    models::Notification,
};
use uuid::Uuid;

pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Notification>>> {
    let user = require_user(&auth)?;
    Ok(Json(state.notifications.list(user.id).await?))
}

pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<Json<Ack>> {
    let user = require_user(&auth)?;

    state.notifications.mark_read(user.id, notification_id).await?;
    Ok(Json(Ack::Read(true)))
}
