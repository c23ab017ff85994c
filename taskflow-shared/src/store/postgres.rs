/// PostgreSQL store
///
/// Each [`Store`] method runs either a single statement or one transaction
/// opened with `pool.begin()`. A transaction dropped before `commit` rolls
/// back, so an early `?` return never leaves partial writes.
///
/// `modify_*` methods lock the row with `SELECT ... FOR UPDATE` before the
/// edit runs, so concurrent edits of one row are applied one after another.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::db::pool::{create_pool, PoolConfig};
/// use taskflow_shared::store::{postgres::PgStore, Store};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(PoolConfig::new(std::env::var("DATABASE_URL")?)).await?;
/// let store = PgStore::new(pool);
///
/// let user = store.find_user_by_id(Uuid::new_v4()).await?;
/// assert!(user.is_none());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{RowEdit, Store, StoreResult};
use crate::models::{
    Activity, Comment, Notification, Project, ProjectMember, Task, TaskFilter, User,
};

const USER_COLUMNS: &str =
    "id, email, name, avatar, role, password_hash, created_at, updated_at";
const TASK_COLUMNS: &str = "id, title, description, status, priority, assignee_id, project_id, \
     due_date, completed_at, created_at, updated_at";
const ACTIVITY_COLUMNS: &str =
    "id, action, description, user_id, task_id, project_id, created_at";

/// [`Store`] backed by a Postgres connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Escapes LIKE metacharacters so the needle matches literally
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

async fn insert_activity(
    tx: &mut Transaction<'_, Postgres>,
    activity: &Activity,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO activities (id, action, description, user_id, task_id, project_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(activity.id)
    .bind(&activity.action)
    .bind(&activity.description)
    .bind(activity.user_id)
    .bind(activity.task_id)
    .bind(activity.project_id)
    .bind(activity.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, avatar, role, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(user.role)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn modify_user(
        &self,
        id: Uuid,
        edit: RowEdit<User, bool>,
    ) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut user) = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1 FOR UPDATE",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        if edit(&mut user) {
            sqlx::query(
                r#"
                UPDATE users
                SET email = $2, name = $3, avatar = $4, role = $5, password_hash = $6,
                    updated_at = $7
                WHERE id = $1
                "#,
            )
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.avatar)
            .bind(user.role)
            .bind(&user.password_hash)
            .bind(user.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(user))
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.description, p.created_at, p.updated_at
            FROM projects p
            INNER JOIN project_members m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn create_project_with_owner(
        &self,
        project: &Project,
        owner: &ProjectMember,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO project_members (id, project_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(owner.id)
        .bind(owner.project_id)
        .bind(owner.user_id)
        .bind(owner.role)
        .bind(owner.joined_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn modify_project(
        &self,
        id: Uuid,
        edit: RowEdit<Project, bool>,
    ) -> StoreResult<Option<Project>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut project) = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM projects
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        if edit(&mut project) {
            sqlx::query(
                r#"
                UPDATE projects
                SET name = $2, description = $3, updated_at = $4
                WHERE id = $1
                "#,
            )
            .bind(project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(project))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM comments
            WHERE task_id IN (SELECT id FROM tasks WHERE project_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM activities
            WHERE project_id = $1
               OR task_id IN (SELECT id FROM tasks WHERE project_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        debug!(project_id = %id, "Project rows deleted");
        Ok(true)
    }

    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<ProjectMember>> {
        let member = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT id, project_id, user_id, role, joined_at
            FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn insert_membership(&self, member: &ProjectMember) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO project_members (id, project_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(member.id)
        .bind(member.project_id)
        .bind(member.user_id)
        .bind(member.role)
        .bind(member.joined_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_membership(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_memberships(&self, project_id: Uuid) -> StoreResult<Vec<ProjectMember>> {
        let members = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT id, project_id, user_id, role, joined_at
            FROM project_members
            WHERE project_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn list_tasks(&self, project_id: Uuid, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM tasks WHERE project_id = ",
            TASK_COLUMNS
        ));
        query.push_bind(project_id);

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(priority) = filter.priority {
            query.push(" AND priority = ").push_bind(priority);
        }
        if let Some(assignee_id) = filter.assignee_id {
            query.push(" AND assignee_id = ").push_bind(assignee_id);
        }
        if let Some(needle) = filter.search_term() {
            let pattern = like_pattern(needle);
            query
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY created_at DESC");

        let tasks = query
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn create_task(&self, task: &Task, activity: &Activity) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, description, status, priority, assignee_id, project_id,
                due_date, completed_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.assignee_id)
        .bind(task.project_id)
        .bind(task.due_date)
        .bind(task.completed_at)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_activity(&mut tx, activity).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn modify_task(
        &self,
        id: Uuid,
        edit: RowEdit<Task, Option<Activity>>,
    ) -> StoreResult<Option<Task>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut task) = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 FOR UPDATE",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        if let Some(activity) = edit(&mut task) {
            sqlx::query(
                r#"
                UPDATE tasks
                SET title = $2, description = $3, status = $4, priority = $5, assignee_id = $6,
                    due_date = $7, completed_at = $8, updated_at = $9
                WHERE id = $1
                "#,
            )
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.assignee_id)
            .bind(task.due_date)
            .bind(task.completed_at)
            .bind(task.updated_at)
            .execute(&mut *tx)
            .await?;

            insert_activity(&mut tx, &activity).await?;
        }

        tx.commit().await?;
        Ok(Some(task))
    }

    async fn delete_task(&self, id: Uuid, activity: &Activity) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE activities SET task_id = NULL WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        insert_activity(&mut tx, activity).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn create_comment(
        &self,
        comment: &Comment,
        activity: Option<&Activity>,
    ) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Holds off a concurrent task delete until the comment is committed
        let task = sqlx::query("SELECT id FROM tasks WHERE id = $1 FOR KEY SHARE")
            .bind(comment.task_id)
            .fetch_optional(&mut *tx)
            .await?;
        if task.is_none() {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO comments (id, content, author_id, task_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(comment.author_id)
        .bind(comment.task_id)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(activity) = activity {
            insert_activity(&mut tx, activity).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn list_comments(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, author_id, task_id, created_at, updated_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn list_project_activities(
        &self,
        project_id: Uuid,
        limit: i64,
    ) -> StoreResult<Vec<Activity>> {
        let activities = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {} FROM activities WHERE project_id = $1 ORDER BY created_at DESC LIMIT $2",
            ACTIVITY_COLUMNS
        ))
        .bind(project_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    async fn list_task_activities(&self, task_id: Uuid) -> StoreResult<Vec<Activity>> {
        let activities = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {} FROM activities WHERE task_id = $1 ORDER BY created_at DESC",
            ACTIVITY_COLUMNS
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    async fn list_notifications(&self, user_id: Uuid) -> StoreResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, title, message, user_id, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, title, message, user_id, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(notification.id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.user_id)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
