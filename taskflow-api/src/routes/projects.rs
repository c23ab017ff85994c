/// Project endpoints
///
/// # Endpoints
///
/// - `GET    /v1/projects` - Projects the caller is a member of
/// - `POST   /v1/projects` - Create a project owned by the caller
/// - `GET    /v1/projects/:id` - Project detail (access)
/// - `PATCH  /v1/projects/:id` - Partial update (manage)
/// - `DELETE /v1/projects/:id` - Delete with everything it owns (manage)
/// - `GET    /v1/projects/:id/stats` - Task counts (access)
/// - `GET    /v1/projects/:id/members` - Memberships (access)
/// - `POST   /v1/projects/:id/members` - Add a member (manage)
/// - `DELETE /v1/projects/:id/members/:user_id` - Remove a member (manage)
///
/// Project-scoped endpoints check membership before looking the project up,
/// so a caller outside the project gets `403` whether or not it exists.

use super::Ack;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use taskflow_shared::{
    auth::{
        authorization::{require_project_access, require_project_manage, require_user},
        middleware::AuthContext,
    },
    error::Error,
    models::{Project, ProjectMember, ProjectStats, Role},
    services::projects::ProjectChanges,
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1 to 200 characters"))]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
}

/// Project update request; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1 to 200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,

    /// Defaults to MEMBER
    #[serde(default)]
    pub role: Role,
}

pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Project>>> {
    let user = require_user(&auth)?;
    Ok(Json(state.projects.list_for_user(user.id).await?))
}

/// The caller becomes a MANAGER member of the new project.
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let user = require_user(&auth)?;
    req.validate()?;

    let project = state
        .projects
        .create(user.id, &req.name, req.description)
        .await?;

    Ok(Json(project))
}

pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let user = require_user(&auth)?;
    require_project_access(&state.members, user, project_id).await?;

    let project = state
        .projects
        .get(project_id)
        .await?
        .ok_or(Error::NotFound("Project"))?;

    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let user = require_user(&auth)?;
    require_project_manage(&state.members, user, project_id).await?;
    req.validate()?;

    let project = state
        .projects
        .update(
            project_id,
            ProjectChanges {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Ack>> {
    let user = require_user(&auth)?;
    require_project_manage(&state.members, user, project_id).await?;

    state.projects.delete(project_id).await?;
    Ok(Json(Ack::Deleted(true)))
}

pub async fn project_stats(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ProjectStats>> {
    let user = require_user(&auth)?;
    require_project_access(&state.members, user, project_id).await?;

    Ok(Json(state.projects.stats(project_id).await?))
}

pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ProjectMember>>> {
    let user = require_user(&auth)?;
    require_project_access(&state.members, user, project_id).await?;

    Ok(Json(state.members.list_members(project_id).await?))
}

/// # Errors
///
/// - `400 Bad Request`: The user is already a member
/// - `403 Forbidden`: Caller lacks manage access
/// - `404 Not Found`: Unknown user
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<ProjectMember>> {
    let user = require_user(&auth)?;
    require_project_manage(&state.members, user, project_id).await?;

    let member = state
        .members
        .add_member(project_id, req.user_id, req.role)
        .await?;

    Ok(Json(member))
}

pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Ack>> {
    let user = require_user(&auth)?;
    require_project_manage(&state.members, user, project_id).await?;

    state.members.remove_member(project_id, user_id).await?;
    Ok(Json(Ack::Removed(true)))
}
