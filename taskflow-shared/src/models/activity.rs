/// Activity log model
///
/// Activities form an append-only audit trail of domain mutations. They are
/// never updated. A `user_id` of `None` denotes the system actor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Action tags emitted by the task lifecycle
pub mod actions {
    pub const TASK_CREATED: &str = "task_created";
    pub const TASK_UPDATED: &str = "task_updated";
    pub const TASK_DELETED: &str = "task_deleted";
    pub const COMMENT_ADDED: &str = "comment_added";
}

/// Audit record of a mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
    pub id: Uuid,

    /// Free-form action tag, see [`actions`]
    pub action: String,

    /// Human-readable description
    pub description: String,

    /// Acting user, `None` for the system actor
    pub user_id: Option<Uuid>,

    pub task_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Builds an activity recorded now
    pub fn new(
        action: &str,
        description: String,
        user_id: Option<Uuid>,
        task_id: Option<Uuid>,
        project_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: action.to_string(),
            description,
            user_id,
            task_id,
            project_id,
            created_at: Utc::now(),
        }
    }
}
