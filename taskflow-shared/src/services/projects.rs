/// Project lifecycle
///
/// Creating a project makes its creator a MANAGER member in the same unit of
/// work. Deleting a project removes its memberships, tasks, comments and
/// activities together with it.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Project, ProjectMember, ProjectStats, Role, TaskFilter};
use crate::store::{RowEdit, Store};

/// Maximum project name length, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Checks a trimmed project name
fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid("name", "Project name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::invalid(
            "name",
            format!("Project name must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(())
}

/// Partial project update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a project owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationFailed` for a blank or overlong name
    pub async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        description: Option<String>,
    ) -> Result<Project> {
        let name = name.trim();
        check_name(name)?;

        let project = Project::new(name.to_string(), description);
        let owner = ProjectMember::new(project.id, owner_id, Role::Manager);
        self.store.create_project_with_owner(&project, &owner).await?;

        info!(project_id = %project.id, owner_id = %owner_id, "Project created");
        Ok(project)
    }

    pub async fn get(&self, project_id: Uuid) -> Result<Option<Project>> {
        Ok(self.store.find_project(project_id).await?)
    }

    /// Projects the user is a member of, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Project>> {
        Ok(self.store.list_projects_for_user(user_id).await?)
    }

    /// Applies a partial update
    ///
    /// `updated_at` only moves if some field actually changed.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the project does not exist
    /// - `Error::ValidationFailed` for a blank or overlong name
    pub async fn update(&self, project_id: Uuid, changes: ProjectChanges) -> Result<Project> {
        let name = changes.name.map(|name| name.trim().to_string());
        if let Some(name) = name.as_deref() {
            check_name(name)?;
        }
        let description = changes.description;

        let edit: RowEdit<Project, bool> = Box::new(move |project: &mut Project| {
            let mut changed = false;
            if let Some(name) = name {
                if project.name != name {
                    project.name = name;
                    changed = true;
                }
            }
            if let Some(description) = description {
                if project.description.as_deref() != Some(description.as_str()) {
                    project.description = Some(description);
                    changed = true;
                }
            }

            if changed {
                project.updated_at = Utc::now();
            }
            changed
        });

        let project = self
            .store
            .modify_project(project_id, edit)
            .await?
            .ok_or(Error::NotFound("Project"))?;

        info!(project_id = %project.id, "Project update applied");
        Ok(project)
    }

    /// Deletes a project and everything it owns
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the project does not exist
    pub async fn delete(&self, project_id: Uuid) -> Result<()> {
        if !self.store.delete_project(project_id).await? {
            return Err(Error::NotFound("Project"));
        }

        info!(project_id = %project_id, "Project deleted");
        Ok(())
    }

    /// Task counts for a project
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the project does not exist
    pub async fn stats(&self, project_id: Uuid) -> Result<ProjectStats> {
        if self.store.find_project(project_id).await?.is_none() {
            return Err(Error::NotFound("Project"));
        }

        let tasks = self
            .store
            .list_tasks(project_id, &TaskFilter::default())
            .await?;

        Ok(ProjectStats::from_tasks(&tasks, Utc::now()))
    }
}
