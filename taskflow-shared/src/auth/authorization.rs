/// Permission checks
///
/// # Permission Model
///
/// 1. **Identity**: most operations require a resolved user (`Unauthenticated`)
/// 2. **Project access**: any membership role reads and edits tasks and comments
/// 3. **Project manage**: MANAGER or ADMIN membership for project mutations
///    and member administration
///
/// Task-scoped operations resolve the task first, so an unknown task id reads
/// as `NotFound` before any permission check, then gate on its project.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::auth::authorization::{require_project_access, require_user};
/// use taskflow_shared::auth::middleware::AuthContext;
/// use taskflow_shared::services::access::MembershipService;
/// use uuid::Uuid;
///
/// # async fn example(
/// #     auth: AuthContext,
/// #     members: MembershipService,
/// #     project_id: Uuid,
/// # ) -> taskflow_shared::error::Result<()> {
/// let user = require_user(&auth)?;
/// require_project_access(&members, user, project_id).await?;
/// # Ok(())
/// # }
/// ```

use tracing::warn;
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::error::{Error, Result};
use crate::models::{Task, User};
use crate::services::access::MembershipService;
use crate::services::tasks::TaskService;

/// Requires a resolved caller
///
/// # Errors
///
/// Returns `Error::Unauthenticated` for an anonymous context
pub fn require_user(auth: &AuthContext) -> Result<&User> {
    auth.user().ok_or(Error::Unauthenticated)
}

/// Requires any membership in the project
///
/// # Errors
///
/// Returns `Error::Forbidden` if the user is not a member
pub async fn require_project_access(
    members: &MembershipService,
    user: &User,
    project_id: Uuid,
) -> Result<()> {
    if !members.has_access(user.id, project_id).await? {
        warn!(user_id = %user.id, project_id = %project_id, "Project access denied");
        return Err(Error::Forbidden("not a member of this project".to_string()));
    }

    Ok(())
}

/// Requires a MANAGER or ADMIN membership in the project
///
/// # Errors
///
/// Returns `Error::Forbidden` if the user lacks manage access
pub async fn require_project_manage(
    members: &MembershipService,
    user: &User,
    project_id: Uuid,
) -> Result<()> {
    if !members.has_manage_access(user.id, project_id).await? {
        warn!(user_id = %user.id, project_id = %project_id, "Project manage access denied");
        return Err(Error::Forbidden(
            "manager or admin role required for this project".to_string(),
        ));
    }

    Ok(())
}

/// Resolves a task and requires access to its project
///
/// # Errors
///
/// Returns `Error::NotFound` if the task does not exist, then
/// `Error::Forbidden` if the user is not a member of its project
pub async fn require_task_access(
    members: &MembershipService,
    tasks: &TaskService,
    user: &User,
    task_id: Uuid,
) -> Result<Task> {
    let task = tasks.get(task_id).await?.ok_or(Error::NotFound("Task"))?;
    require_project_access(members, user, task.project_id).await?;
    Ok(task)
}
