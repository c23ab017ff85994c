/// Task lifecycle and activity log
///
/// Every task mutation is persisted together with the activity that
/// describes it:
///
/// | Operation     | Action          | Activity emitted                     |
/// |---------------|-----------------|--------------------------------------|
/// | `create`      | `task_created`  | always                               |
/// | `update`      | `task_updated`  | only if at least one field changed   |
/// | `delete`      | `task_deleted`  | always, referencing the project only |
/// | `add_comment` | `comment_added` | always, attributed to the author     |
///
/// The actor recorded for updates and deletions follows
/// [`ActivityAttribution`].
///
/// Status transitions are unconstrained (see
/// [`TaskStatus::can_transition_to`]). Entering DONE stamps `completed_at`;
/// leaving DONE clears it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::activity::actions;
use crate::models::{Activity, Comment, Priority, Task, TaskFilter, TaskStatus};
use crate::store::{RowEdit, Store};

/// Maximum task title length, in characters
pub const MAX_TITLE_LENGTH: usize = 255;

/// Default number of project activities returned
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 50;

/// Upper bound on project activities returned
pub const MAX_ACTIVITY_LIMIT: i64 = 200;

/// Who an update or deletion activity is attributed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivityAttribution {
    /// The user performing the operation
    #[default]
    Caller,

    /// The task's assignee, or the system actor when unassigned
    AssigneeOrSystem,
}

impl ActivityAttribution {
    /// Parses a configured value (`caller` or `assignee`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "caller" => Some(ActivityAttribution::Caller),
            "assignee" | "assignee_or_system" => Some(ActivityAttribution::AssigneeOrSystem),
            _ => None,
        }
    }

    /// Actor id to record; `None` is the system actor
    pub fn actor(&self, caller: Uuid, task: &Task) -> Option<Uuid> {
        match self {
            ActivityAttribution::Caller => Some(caller),
            ActivityAttribution::AssigneeOrSystem => task.assignee_id,
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<Uuid>,

    /// Defaults to MEDIUM
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial task update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Applies changes to a task, returning one fragment per changed field
///
/// Fields equal to the current value are skipped. `updated_at` is set to
/// `now` only when something changed.
pub fn apply_changes(task: &mut Task, changes: TaskChanges, now: DateTime<Utc>) -> Vec<String> {
    let mut fragments = Vec::new();

    if let Some(title) = changes.title {
        if title != task.title {
            fragments.push(format!("title changed from '{}' to '{}'", task.title, title));
            task.title = title;
        }
    }

    if let Some(description) = changes.description {
        if task.description.as_deref() != Some(description.as_str()) {
            fragments.push("description updated".to_string());
            task.description = Some(description);
        }
    }

    if let Some(status) = changes.status {
        if status != task.status && task.status.can_transition_to(status) {
            fragments.push(format!(
                "status changed from '{}' to '{}'",
                task.status.as_str(),
                status.as_str()
            ));
            task.set_status(status, now);
        }
    }

    if let Some(priority) = changes.priority {
        if priority != task.priority {
            fragments.push(format!(
                "priority changed from '{}' to '{}'",
                task.priority.as_str(),
                priority.as_str()
            ));
            task.priority = priority;
        }
    }

    if let Some(assignee_id) = changes.assignee_id {
        if task.assignee_id != Some(assignee_id) {
            fragments.push("assignee changed".to_string());
            task.assignee_id = Some(assignee_id);
        }
    }

    if let Some(due_date) = changes.due_date {
        if task.due_date != Some(due_date) {
            fragments.push("due date changed".to_string());
            task.due_date = Some(due_date);
        }
    }

    if !fragments.is_empty() {
        task.updated_at = now;
    }

    fragments
}

/// Checks a trimmed task title
fn check_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(Error::invalid("title", "Task title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(Error::invalid(
            "title",
            format!("Task title must be at most {} characters", MAX_TITLE_LENGTH),
        ));
    }
    Ok(())
}

/// Clamps a requested activity limit to `1..=MAX_ACTIVITY_LIMIT`
pub fn clamp_activity_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT)
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
    attribution: ActivityAttribution,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>, attribution: ActivityAttribution) -> Self {
        Self { store, attribution }
    }

    /// Active attribution policy
    pub fn attribution(&self) -> ActivityAttribution {
        self.attribution
    }

    async fn check_assignee(&self, assignee_id: Option<Uuid>) -> Result<()> {
        if let Some(id) = assignee_id {
            if self.store.find_user_by_id(id).await?.is_none() {
                return Err(Error::invalid("assignee_id", "Assignee does not exist"));
            }
        }
        Ok(())
    }

    /// Tasks of a project matching `filter`, newest first
    pub async fn list(&self, project_id: Uuid, filter: &TaskFilter) -> Result<Vec<Task>> {
        let tasks = self.store.list_tasks(project_id, filter).await?;
        debug!(project_id = %project_id, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    pub async fn get(&self, task_id: Uuid) -> Result<Option<Task>> {
        Ok(self.store.find_task(task_id).await?)
    }

    /// Creates a TODO task in a project
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the project does not exist
    /// - `Error::ValidationFailed` for a blank or overlong title, or an
    ///   unknown assignee
    pub async fn create(
        &self,
        acting_user_id: Uuid,
        project_id: Uuid,
        input: NewTask,
    ) -> Result<Task> {
        let title = input.title.trim();
        check_title(title)?;
        if self.store.find_project(project_id).await?.is_none() {
            return Err(Error::NotFound("Project"));
        }
        self.check_assignee(input.assignee_id).await?;

        let task = Task::new(
            project_id,
            title.to_string(),
            input.description,
            input.assignee_id,
            input.priority.unwrap_or_default(),
            input.due_date,
        );

        let activity = Activity::new(
            actions::TASK_CREATED,
            format!("Created task '{}'", task.title),
            Some(acting_user_id),
            Some(task.id),
            Some(project_id),
        );

        self.store.create_task(&task, &activity).await?;

        info!(task_id = %task.id, project_id = %project_id, "Task created");
        Ok(task)
    }

    /// Applies a partial update and records what changed
    ///
    /// The changes are applied to the stored row inside the store's unit of
    /// work, so the activity always describes the row that was written.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the task does not exist
    /// - `Error::ValidationFailed` for a blank or overlong title, or an
    ///   unknown assignee
    pub async fn update(
        &self,
        acting_user_id: Uuid,
        task_id: Uuid,
        mut changes: TaskChanges,
    ) -> Result<Task> {
        if let Some(title) = changes.title.as_mut() {
            *title = title.trim().to_string();
            check_title(title)?;
        }
        self.check_assignee(changes.assignee_id).await?;

        let attribution = self.attribution;
        let edit: RowEdit<Task, Option<Activity>> = Box::new(move |task: &mut Task| {
            let fragments = apply_changes(task, changes, Utc::now());
            if fragments.is_empty() {
                return None;
            }

            Some(Activity::new(
                actions::TASK_UPDATED,
                format!("Updated task '{}': {}", task.title, fragments.join(", ")),
                attribution.actor(acting_user_id, task),
                Some(task.id),
                Some(task.project_id),
            ))
        });

        let task = self
            .store
            .modify_task(task_id, edit)
            .await?
            .ok_or(Error::NotFound("Task"))?;

        info!(task_id = %task.id, "Task update applied");
        Ok(task)
    }

    /// Deletes a task with its comments
    ///
    /// The deletion activity references the project, not the task.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the task does not exist
    pub async fn delete(&self, acting_user_id: Uuid, task_id: Uuid) -> Result<()> {
        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or(Error::NotFound("Task"))?;

        let activity = Activity::new(
            actions::TASK_DELETED,
            format!("Deleted task '{}'", task.title),
            self.attribution.actor(acting_user_id, &task),
            None,
            Some(task.project_id),
        );

        if !self.store.delete_task(task.id, &activity).await? {
            return Err(Error::NotFound("Task"));
        }

        info!(task_id = %task.id, project_id = %task.project_id, "Task deleted");
        Ok(())
    }

    /// Adds a comment authored by the acting user
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the task does not exist
    /// - `Error::ValidationFailed` for blank content
    pub async fn add_comment(
        &self,
        acting_user_id: Uuid,
        task_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::invalid("content", "Comment must not be empty"));
        }

        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or(Error::NotFound("Task"))?;

        let comment = Comment::new(task.id, acting_user_id, content.to_string());
        let activity = Activity::new(
            actions::COMMENT_ADDED,
            format!("Commented on task '{}'", task.title),
            Some(acting_user_id),
            Some(task.id),
            Some(task.project_id),
        );

        if !self.store.create_comment(&comment, Some(&activity)).await? {
            return Err(Error::NotFound("Task"));
        }

        debug!(comment_id = %comment.id, task_id = %task.id, "Comment added");
        Ok(comment)
    }

    /// Comments of a task, oldest first
    pub async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>> {
        Ok(self.store.list_comments(task_id).await?)
    }

    /// Most recent activities of a project, newest first
    ///
    /// `limit` defaults to 50 and is clamped to `1..=200`.
    pub async fn list_project_activities(
        &self,
        project_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Activity>> {
        Ok(self
            .store
            .list_project_activities(project_id, clamp_activity_limit(limit))
            .await?)
    }

    /// Activities of a task, newest first
    pub async fn list_task_activities(&self, task_id: Uuid) -> Result<Vec<Activity>> {
        Ok(self.store.list_task_activities(task_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task::new(
            Uuid::new_v4(),
            "A".to_string(),
            Some("first".to_string()),
            None,
            Priority::Low,
            None,
        )
    }

    #[test]
    fn test_apply_changes_fragments() {
        let mut t = task();
        let now = Utc::now();
        let changes = TaskChanges {
            title: Some("B".to_string()),
            description: Some("second".to_string()),
            status: Some(TaskStatus::Done),
            priority: Some(Priority::High),
            assignee_id: Some(Uuid::new_v4()),
            due_date: Some(now),
        };

        let fragments = apply_changes(&mut t, changes, now);
        assert_eq!(
            fragments,
            vec![
                "title changed from 'A' to 'B'",
                "description updated",
                "status changed from 'TODO' to 'DONE'",
                "priority changed from 'LOW' to 'HIGH'",
                "assignee changed",
                "due date changed",
            ]
        );
        assert_eq!(t.completed_at, Some(now));
        assert_eq!(t.updated_at, now);
    }

    #[test]
    fn test_apply_changes_skips_equal_values() {
        let mut t = task();
        let before = t.updated_at;
        let changes = TaskChanges {
            title: Some("A".to_string()),
            description: Some("first".to_string()),
            status: Some(TaskStatus::Todo),
            priority: Some(Priority::Low),
            ..Default::default()
        };

        let later = Utc::now() + chrono::Duration::seconds(5);
        let fragments = apply_changes(&mut t, changes, later);
        assert!(fragments.is_empty());
        assert_eq!(t.updated_at, before);
    }

    #[test]
    fn test_apply_changes_leaving_done_clears_completion() {
        let mut t = task();
        let now = Utc::now();
        let done = TaskChanges {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        apply_changes(&mut t, done, now);
        assert!(t.completed_at.is_some());

        let reopened = TaskChanges {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        let fragments = apply_changes(&mut t, reopened, now);
        assert_eq!(fragments, vec!["status changed from 'DONE' to 'IN_PROGRESS'"]);
        assert!(t.completed_at.is_none());
    }

    #[test]
    fn test_attribution() {
        let caller = Uuid::new_v4();
        let mut t = task();

        assert_eq!(ActivityAttribution::Caller.actor(caller, &t), Some(caller));
        assert_eq!(ActivityAttribution::AssigneeOrSystem.actor(caller, &t), None);

        let assignee = Uuid::new_v4();
        t.assignee_id = Some(assignee);
        assert_eq!(ActivityAttribution::AssigneeOrSystem.actor(caller, &t), Some(assignee));
    }

    #[test]
    fn test_attribution_parse() {
        assert_eq!(ActivityAttribution::parse("caller"), Some(ActivityAttribution::Caller));
        assert_eq!(
            ActivityAttribution::parse("Assignee"),
            Some(ActivityAttribution::AssigneeOrSystem)
        );
        assert_eq!(ActivityAttribution::parse("owner"), None);
        assert_eq!(ActivityAttribution::default(), ActivityAttribution::Caller);
    }

    #[test]
    fn test_title_length_limit() {
        assert!(check_title(&"t".repeat(MAX_TITLE_LENGTH)).is_ok());
        // Counted in characters, not bytes
        assert!(check_title(&"é".repeat(MAX_TITLE_LENGTH)).is_ok());

        let err = check_title(&"t".repeat(MAX_TITLE_LENGTH + 1)).unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(ref fields) if fields[0].field == "title"));
        assert!(check_title("").is_err());
    }

    #[test]
    fn test_clamp_activity_limit() {
        assert_eq!(clamp_activity_limit(None), 50);
        assert_eq!(clamp_activity_limit(Some(0)), 1);
        assert_eq!(clamp_activity_limit(Some(-5)), 1);
        assert_eq!(clamp_activity_limit(Some(10)), 10);
        assert_eq!(clamp_activity_limit(Some(10_000)), 200);
    }
}
