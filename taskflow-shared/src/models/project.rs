/// Project model and task statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::{Task, TaskStatus};

/// A project groups members and tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Aggregate task counts for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,

    /// Tasks past their due date that are not DONE
    pub overdue_tasks: usize,

    /// Percentage of DONE tasks, 0.0 for an empty project
    pub completion_rate: f64,
}

impl ProjectStats {
    /// Computes statistics over a project's tasks as of `now`
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let total_tasks = tasks.len();
        let completed_tasks = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count();
        let in_progress_tasks = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .count();
        let overdue_tasks = tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Done)
            .filter(|t| t.due_date.map_or(false, |due| due < now))
            .count();

        let completion_rate = if total_tasks == 0 {
            0.0
        } else {
            completed_tasks as f64 / total_tasks as f64 * 100.0
        };

        Self {
            total_tasks,
            completed_tasks,
            in_progress_tasks,
            overdue_tasks,
            completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::Priority;
    use chrono::Duration;

    fn task(project_id: Uuid, status: TaskStatus, due: Option<DateTime<Utc>>) -> Task {
        let mut t = Task::new(project_id, "t".to_string(), None, None, Priority::Medium, due);
        t.status = status;
        t
    }

    #[test]
    fn test_stats_empty_project() {
        let stats = ProjectStats::from_tasks(&[], Utc::now());
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn test_stats_counts() {
        let now = Utc::now();
        let p = Uuid::new_v4();
        let tasks = vec![
            task(p, TaskStatus::Done, Some(now - Duration::days(2))),
            task(p, TaskStatus::InProgress, Some(now - Duration::days(1))),
            task(p, TaskStatus::Todo, Some(now + Duration::days(1))),
            task(p, TaskStatus::Review, None),
        ];

        let stats = ProjectStats::from_tasks(&tasks, now);
        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.in_progress_tasks, 1);
        // The DONE task is past due but does not count as overdue
        assert_eq!(stats.overdue_tasks, 1);
        assert_eq!(stats.completion_rate, 25.0);
    }
}
