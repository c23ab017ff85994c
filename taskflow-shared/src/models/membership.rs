/// Project membership model
///
/// A membership binds one user to one project with a per-project role.
/// At most one row exists per `(project_id, user_id)` pair.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('ADMIN', 'MANAGER', 'MEMBER');
///
/// CREATE TABLE project_members (
///     id UUID PRIMARY KEY,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role user_role NOT NULL DEFAULT 'MEMBER',
///     joined_at TIMESTAMPTZ NOT NULL,
///     CONSTRAINT project_members_project_id_user_id_key UNIQUE (project_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **ADMIN**: may manage the project
/// - **MANAGER**: may manage the project (equivalent to ADMIN for project mutations)
/// - **MEMBER**: may read the project and create, edit and delete its tasks and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role, used both as a user's directory-wide default and as a per-project role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Member,
}

impl Role {
    /// Converts role to its stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Member => "MEMBER",
        }
    }

    /// Whether the role grants manage access to a project
    ///
    /// MANAGER and ADMIN are equivalent here; there is no further hierarchy.
    pub fn can_manage_project(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Member
    }
}

/// Membership of a user in a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMember {
    /// Membership ID
    pub id: Uuid,

    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: Role,

    /// When the user joined the project
    pub joined_at: DateTime<Utc>,
}

impl ProjectMember {
    /// Builds a new membership row joined now
    pub fn new(project_id: Uuid, user_id: Uuid, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }
}
