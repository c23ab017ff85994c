/// Domain models for TaskFlow
///
/// Plain entity structs shared by the storage backends, the services and the
/// HTTP layer. Persistence lives behind [`crate::store::Store`]; the models
/// only carry constructors and value-level rules.
///
/// # Models
///
/// - `user`: User accounts
/// - `membership`: Roles and user-project memberships
/// - `project`: Projects and their task statistics
/// - `task`: Tasks, statuses, priorities and list filters
/// - `comment`: Task comments
/// - `activity`: Append-only activity log
/// - `notification`: Per-user notifications
///
/// # Example
///
/// ```
/// use taskflow_shared::models::task::{Priority, Task, TaskStatus};
/// use uuid::Uuid;
///
/// let project_id = Uuid::new_v4();
/// let mut task = Task::new(project_id, "Ship it".to_string(), None, None, Priority::High, None);
/// task.set_status(TaskStatus::Done, chrono::Utc::now());
/// assert!(task.completed_at.is_some());
/// ```

pub mod activity;
pub mod comment;
pub mod membership;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;

pub use activity::Activity;
pub use comment::Comment;
pub use membership::{ProjectMember, Role};
pub use notification::Notification;
pub use project::{Project, ProjectStats};
pub use task::{Priority, Task, TaskFilter, TaskStatus};
pub use user::User;
