/// Task model
///
/// Tasks belong to exactly one project and are edited by any project member.
///
/// # Status Transitions
///
/// ```text
/// TODO ⇄ IN_PROGRESS ⇄ REVIEW ⇄ DONE
/// ```
///
/// The four statuses describe a conventional flow, but every ordered pair is
/// an allowed transition. `completed_at` is set exactly when a task enters
/// DONE and cleared when it leaves DONE.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'REVIEW', 'DONE');
/// CREATE TYPE task_priority AS ENUM ('LOW', 'MEDIUM', 'HIGH', 'URGENT');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'TODO',
///     priority task_priority NOT NULL DEFAULT 'MEDIUM',
///     assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     due_date TIMESTAMPTZ,
///     completed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// All statuses in workflow order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Converts status to its stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Review => "REVIEW",
            TaskStatus::Done => "DONE",
        }
    }

    /// Checks if transition to target status is valid
    ///
    /// The transition table is open: any status may move to any other,
    /// including backwards moves such as DONE → TODO.
    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        match (self, target) {
            (TaskStatus::Todo, _) => true,
            (TaskStatus::InProgress, _) => true,
            (TaskStatus::Review, _) => true,
            (TaskStatus::Done, _) => true,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Converts priority to its stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Task within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: Priority,

    /// Assigned user, if any
    pub assignee_id: Option<Uuid>,

    /// Owning project
    pub project_id: Uuid,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Set while status is DONE
    pub completed_at: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new TODO task created now
    pub fn new(
        project_id: Uuid,
        title: String,
        description: Option<String>,
        assignee_id: Option<Uuid>,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            status: TaskStatus::Todo,
            priority,
            assignee_id,
            project_id,
            due_date,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the task to `status`, maintaining `completed_at`
    ///
    /// Entering DONE stamps `completed_at` with `now`; leaving DONE clears it.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        if status == TaskStatus::Done && self.status != TaskStatus::Done {
            self.completed_at = Some(now);
        } else if status != TaskStatus::Done {
            self.completed_at = None;
        }
        self.status = status;
    }
}

/// Conjunctive filter for listing a project's tasks
///
/// Every supplied predicate must hold. `search` is a case-insensitive
/// substring matched against the title or the description.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<Uuid>,
    pub search: Option<String>,
}

impl TaskFilter {
    /// Returns the search needle, if a non-empty one was supplied
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Evaluates the filter against a task in memory
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.map_or(false, |s| s != task.status) {
            return false;
        }
        if self.priority.map_or(false, |p| p != task.priority) {
            return false;
        }
        if self.assignee_id.is_some() && self.assignee_id != task.assignee_id {
            return false;
        }
        if let Some(needle) = self.search_term() {
            let needle = needle.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_description = task
                .description
                .as_deref()
                .map_or(false, |d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}
