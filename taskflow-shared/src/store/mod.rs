/// Persistence contract
///
/// The [`Store`] trait is the seam between the domain services and storage.
/// Each method is one atomic unit of work: a backend either applies all of
/// its writes or none of them. Multi-step mutations the services need to be
/// atomic (project + owner membership, task write + activity, cascade
/// deletes) are therefore single trait methods rather than sequences.
///
/// # Backends
///
/// - [`postgres::PgStore`]: sqlx over a `PgPool`, one transaction per method
/// - [`memory::MemoryStore`]: in-process tables behind one mutex, used by tests
///   and by the development server when no database is configured
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskflow_shared::store::{memory::MemoryStore, Store};
///
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Activity, Comment, Notification, Project, ProjectMember, Task, TaskFilter, User,
};

/// Unique constraints the domain reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `users_email_key`
    UserEmail,

    /// `project_members_project_id_user_id_key`
    ProjectMember,

    /// Any other named constraint
    Other(String),
}

impl Constraint {
    /// Maps a Postgres constraint name to a known constraint
    pub fn from_name(name: &str) -> Self {
        match name {
            "users_email_key" => Constraint::UserEmail,
            "project_members_project_id_user_id_key" => Constraint::ProjectMember,
            other => Constraint::Other(other.to_string()),
        }
    }
}

/// Storage failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0:?}")]
    Conflict(Constraint),

    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Backend cannot serve requests
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // 23505 = unique_violation
            if db_err.code().as_deref() == Some("23505") {
                let name = db_err.constraint().unwrap_or_default();
                return StoreError::Conflict(Constraint::from_name(name));
            }
        }
        StoreError::Database(err)
    }
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// In-place edit run against a row while the backend holds it locked
///
/// The return value decides whether the edited row is written back.
pub type RowEdit<T, R> = Box<dyn FnOnce(&mut T) -> R + Send>;

/// Persistent storage for every TaskFlow entity
///
/// Write methods receive fully-built entities; identifiers and timestamps are
/// assigned by the caller. `modify_*` methods read the current row, run the
/// edit and write the result in one unit of work, returning `None` when the
/// row does not exist.
#[async_trait]
pub trait Store: Send + Sync {
    // Users

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Exact, case-sensitive email lookup
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts a user, `Conflict(UserEmail)` on a taken email
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Edits a user row; the edit returns `true` to write it back
    ///
    /// `Conflict(UserEmail)` if the edited email belongs to another user.
    async fn modify_user(
        &self,
        id: Uuid,
        edit: RowEdit<User, bool>,
    ) -> StoreResult<Option<User>>;

    // Projects

    /// Projects the user is a member of, newest first
    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>>;

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Inserts a project together with its owner membership
    async fn create_project_with_owner(
        &self,
        project: &Project,
        owner: &ProjectMember,
    ) -> StoreResult<()>;

    /// Edits a project row; the edit returns `true` to write it back
    async fn modify_project(
        &self,
        id: Uuid,
        edit: RowEdit<Project, bool>,
    ) -> StoreResult<Option<Project>>;

    /// Deletes a project with its memberships, tasks, comments and activities
    async fn delete_project(&self, id: Uuid) -> StoreResult<bool>;

    // Memberships

    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ProjectMember>>;

    /// Inserts a membership, `Conflict(ProjectMember)` if the pair exists
    async fn insert_membership(&self, member: &ProjectMember) -> StoreResult<()>;

    async fn delete_membership(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    /// Memberships of a project, oldest first
    async fn list_memberships(&self, project_id: Uuid) -> StoreResult<Vec<ProjectMember>>;

    // Tasks

    /// Tasks of a project matching the filter, newest first
    async fn list_tasks(&self, project_id: Uuid, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Inserts a task and its creation activity
    async fn create_task(&self, task: &Task, activity: &Activity) -> StoreResult<()>;

    /// Edits a task row
    ///
    /// When the edit returns an activity the row is written back and the
    /// activity appended; otherwise nothing is written.
    async fn modify_task(
        &self,
        id: Uuid,
        edit: RowEdit<Task, Option<Activity>>,
    ) -> StoreResult<Option<Task>>;

    /// Deletes a task with its comments, detaches its activities and appends
    /// the deletion activity
    async fn delete_task(&self, id: Uuid, activity: &Activity) -> StoreResult<bool>;

    // Comments

    /// Inserts a comment and, if given, appends the activity
    ///
    /// Returns `false` without writing when the task no longer exists.
    async fn create_comment(
        &self,
        comment: &Comment,
        activity: Option<&Activity>,
    ) -> StoreResult<bool>;

    /// Comments of a task, oldest first
    async fn list_comments(&self, task_id: Uuid) -> StoreResult<Vec<Comment>>;

    // Activities

    /// Activities of a project, newest first, at most `limit`
    async fn list_project_activities(
        &self,
        project_id: Uuid,
        limit: i64,
    ) -> StoreResult<Vec<Activity>>;

    /// Activities of a task, newest first
    async fn list_task_activities(&self, task_id: Uuid) -> StoreResult<Vec<Activity>>;

    // Notifications

    /// Notifications of a user, newest first
    async fn list_notifications(&self, user_id: Uuid) -> StoreResult<Vec<Notification>>;

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()>;

    /// Sets the read flag on a notification owned by `user_id`
    ///
    /// Returns `false` when no such notification is owned by the user.
    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool>;
}
