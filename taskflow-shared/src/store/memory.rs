/// In-memory store
///
/// All tables live behind a single `parking_lot::Mutex`. Every trait method
/// takes the lock once, so each method is atomic with respect to the others,
/// matching the transaction-per-method contract of the Postgres backend.
/// Row edits run while the lock is held.
///
/// Data is lost when the store is dropped. Rows are kept in insertion order;
/// listings sort by timestamp, newest-inserted first on ties.

use std::cmp::Reverse;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use super::{Constraint, RowEdit, Store, StoreError, StoreResult};
use crate::models::{
    Activity, Comment, Notification, Project, ProjectMember, Task, TaskFilter, User,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    members: Vec<ProjectMember>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
    activities: Vec<Activity>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-process [`Store`] for tests and development
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of activities recorded (for testing)
    pub fn activity_count(&self) -> usize {
        self.tables.lock().activities.len()
    }
}

/// Collects rows newest first, keeping later insertions ahead on equal keys
fn newest_first<T, K: Ord>(
    rows: impl DoubleEndedIterator<Item = T>,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut out: Vec<T> = rows.rev().collect();
    out.sort_by_key(|row| Reverse(key(row)));
    out
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.lock();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        if tables.email_taken(&user.email, None) {
            return Err(StoreError::Conflict(Constraint::UserEmail));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn modify_user(
        &self,
        id: Uuid,
        edit: RowEdit<User, bool>,
    ) -> StoreResult<Option<User>> {
        let mut tables = self.tables.lock();
        let Some(index) = tables.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };

        let mut user = tables.users[index].clone();
        if edit(&mut user) {
            if tables.email_taken(&user.email, Some(user.id)) {
                return Err(StoreError::Conflict(Constraint::UserEmail));
            }
            tables.users[index] = user.clone();
        }
        Ok(Some(user))
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let tables = self.tables.lock();
        let joined = tables.projects.iter().filter(|p| {
            tables
                .members
                .iter()
                .any(|m| m.project_id == p.id && m.user_id == user_id)
        });
        Ok(newest_first(joined.cloned(), |p| p.created_at))
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let tables = self.tables.lock();
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn create_project_with_owner(
        &self,
        project: &Project,
        owner: &ProjectMember,
    ) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        tables.projects.push(project.clone());
        tables.members.push(owner.clone());
        Ok(())
    }

    async fn modify_project(
        &self,
        id: Uuid,
        edit: RowEdit<Project, bool>,
    ) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.lock();
        let Some(row) = tables.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        let mut project = row.clone();
        if edit(&mut project) {
            *row = project.clone();
        }
        Ok(Some(project))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock();
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Ok(false);
        }

        let task_ids: Vec<Uuid> = tables
            .tasks
            .iter()
            .filter(|t| t.project_id == id)
            .map(|t| t.id)
            .collect();

        tables.comments.retain(|c| !task_ids.contains(&c.task_id));
        tables.activities.retain(|a| {
            a.project_id != Some(id) && a.task_id.map_or(true, |t| !task_ids.contains(&t))
        });
        tables.tasks.retain(|t| t.project_id != id);
        tables.members.retain(|m| m.project_id != id);
        Ok(true)
    }

    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ProjectMember>> {
        let tables = self.tables.lock();
        Ok(tables
            .members
            .iter()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .cloned())
    }

    async fn insert_membership(&self, member: &ProjectMember) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let exists = tables
            .members
            .iter()
            .any(|m| m.project_id == member.project_id && m.user_id == member.user_id);
        if exists {
            return Err(StoreError::Conflict(Constraint::ProjectMember));
        }
        tables.members.push(member.clone());
        Ok(())
    }

    async fn delete_membership(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock();
        let before = tables.members.len();
        tables
            .members
            .retain(|m| !(m.project_id == project_id && m.user_id == user_id));
        Ok(tables.members.len() != before)
    }

    async fn list_memberships(&self, project_id: Uuid) -> StoreResult<Vec<ProjectMember>> {
        let tables = self.tables.lock();
        let mut members: Vec<ProjectMember> = tables
            .members
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }

    async fn list_tasks(&self, project_id: Uuid, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let tables = self.tables.lock();
        let matching: Vec<Task> = tables
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id && filter.matches(t))
            .cloned()
            .collect();
        Ok(newest_first(matching.into_iter(), |t| t.created_at))
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tables = self.tables.lock();
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn create_task(&self, task: &Task, activity: &Activity) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        tables.tasks.push(task.clone());
        tables.activities.push(activity.clone());
        Ok(())
    }

    async fn modify_task(
        &self,
        id: Uuid,
        edit: RowEdit<Task, Option<Activity>>,
    ) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.lock();
        let Some(row) = tables.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        let mut task = row.clone();
        if let Some(activity) = edit(&mut task) {
            *row = task.clone();
            tables.activities.push(activity);
        }
        Ok(Some(task))
    }

    async fn delete_task(&self, id: Uuid, activity: &Activity) -> StoreResult<bool> {
        let mut tables = self.tables.lock();
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        if tables.tasks.len() == before {
            return Ok(false);
        }

        tables.comments.retain(|c| c.task_id != id);
        for row in tables.activities.iter_mut() {
            if row.task_id == Some(id) {
                row.task_id = None;
            }
        }
        tables.activities.push(activity.clone());
        Ok(true)
    }

    async fn create_comment(
        &self,
        comment: &Comment,
        activity: Option<&Activity>,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.lock();
        if !tables.tasks.iter().any(|t| t.id == comment.task_id) {
            return Ok(false);
        }
        tables.comments.push(comment.clone());
        if let Some(activity) = activity {
            tables.activities.push(activity.clone());
        }
        Ok(true)
    }

    async fn list_comments(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.lock();
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn list_project_activities(
        &self,
        project_id: Uuid,
        limit: i64,
    ) -> StoreResult<Vec<Activity>> {
        let tables = self.tables.lock();
        let matching: Vec<Activity> = tables
            .activities
            .iter()
            .filter(|a| a.project_id == Some(project_id))
            .cloned()
            .collect();
        let mut out = newest_first(matching.into_iter(), |a| a.created_at);
        out.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(out)
    }

    async fn list_task_activities(&self, task_id: Uuid) -> StoreResult<Vec<Activity>> {
        let tables = self.tables.lock();
        let matching: Vec<Activity> = tables
            .activities
            .iter()
            .filter(|a| a.task_id == Some(task_id))
            .cloned()
            .collect();
        Ok(newest_first(matching.into_iter(), |a| a.created_at))
    }

    async fn list_notifications(&self, user_id: Uuid) -> StoreResult<Vec<Notification>> {
        let tables = self.tables.lock();
        let matching: Vec<Notification> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(matching.into_iter(), |n| n.created_at))
    }

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        self.tables.lock().notifications.push(notification.clone());
        Ok(())
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock();
        match tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(row) => {
                row.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
