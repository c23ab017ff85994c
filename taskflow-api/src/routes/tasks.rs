/// Task, comment and activity endpoints
///
/// # Endpoints
///
/// - `GET    /v1/projects/:id/tasks` - Filtered task list (access)
/// - `POST   /v1/projects/:id/tasks` - Create a task (access)
/// - `GET    /v1/projects/:id/activities` - Project activity feed (access)
/// - `GET    /v1/tasks/:id` - Task detail (access)
/// - `PATCH  /v1/tasks/:id` - Partial update (access)
/// - `DELETE /v1/tasks/:id` - Delete with its comments (access)
/// - `GET    /v1/tasks/:id/comments` - Comments, oldest first (access)
/// - `POST   /v1/tasks/:id/comments` - Add a comment (access)
/// - `GET    /v1/tasks/:id/activities` - Task activity feed (access)
///
/// Task-scoped endpoints resolve the task first: an unknown task id is a
/// `404` before any membership check on its project.
///
/// # Filters
///
/// `GET /v1/projects/:id/tasks?status=DONE&priority=HIGH&assignee_id=<uuid>&search=docs`
///
/// Every supplied parameter must match; `search` is a case-insensitive
/// substring of the title or description.

use super::Ack;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskflow_shared::{
    auth::{
        authorization::{require_project_access, require_task_access, require_user},
        middleware::AuthContext,
    },
    models::{Activity, Comment, Priority, Task, TaskFilter, TaskStatus},
    services::tasks::{NewTask, TaskChanges},
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    pub assignee_id: Option<Uuid>,

    /// Defaults to MEDIUM
    pub priority: Option<Priority>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Task update request; omitted or null fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Add comment request
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 10000, message = "Comment must be 1 to 10000 characters"))]
    pub content: String,
}

/// Activity feed query
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Defaults to 50, clamped to 1..=200
    pub limit: Option<i64>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    let user = require_user(&auth)?;
    require_project_access(&state.members, user, project_id).await?;

    Ok(Json(state.tasks.list(project_id, &filter).await?))
}

/// # Errors
///
/// - `400 Bad Request`: Blank title or unknown assignee
/// - `403 Forbidden`: Caller is not a project member
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let user = require_user(&auth)?;
    require_project_access(&state.members, user, project_id).await?;
    req.validate()?;

    let task = state
        .tasks
        .create(
            user.id,
            project_id,
            NewTask {
                title: req.title,
                description: req.description,
                assignee_id: req.assignee_id,
                priority: req.priority,
                due_date: req.due_date,
            },
        )
        .await?;

    Ok(Json(task))
}

pub async fn project_activities(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Json<Vec<Activity>>> {
    let user = require_user(&auth)?;
    require_project_access(&state.members, user, project_id).await?;

    let activities = state
        .tasks
        .list_project_activities(project_id, query.limit)
        .await?;

    Ok(Json(activities))
}

pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let user = require_user(&auth)?;
    let task = require_task_access(&state.members, &state.tasks, user, task_id).await?;

    Ok(Json(task))
}

/// Applies the supplied fields and records one `task_updated` activity
/// when anything changed.
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let user = require_user(&auth)?;
    require_task_access(&state.members, &state.tasks, user, task_id).await?;
    req.validate()?;

    let task = state
        .tasks
        .update(
            user.id,
            task_id,
            TaskChanges {
                title: req.title,
                description: req.description,
                status: req.status,
                priority: req.priority,
                assignee_id: req.assignee_id,
                due_date: req.due_date,
            },
        )
        .await?;

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Ack>> {
    let user = require_user(&auth)?;
    require_task_access(&state.members, &state.tasks, user, task_id).await?;

    state.tasks.delete(user.id, task_id).await?;
    Ok(Json(Ack::Deleted(true)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    let user = require_user(&auth)?;
    require_task_access(&state.members, &state.tasks, user, task_id).await?;

    Ok(Json(state.tasks.list_comments(task_id).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
    Json(req): Json<AddCommentRequest>,
) -> ApiResult<Json<Comment>> {
    let user = require_user(&auth)?;
    require_task_access(&state.members, &state.tasks, user, task_id).await?;
    req.validate()?;

    let comment = state
        .tasks
        .add_comment(user.id, task_id, &req.content)
        .await?;

    Ok(Json(comment))
}

pub async fn task_activities(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Activity>>> {
    let user = require_user(&auth)?;
    require_task_access(&state.members, &state.tasks, user, task_id).await?;

    Ok(Json(state.tasks.list_task_activities(task_id).await?))
}
