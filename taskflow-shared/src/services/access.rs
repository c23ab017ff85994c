/// Membership and access control
///
/// Access is purely membership-based: any role in a project grants access to
/// it. The only role distinction is manage access, which MANAGER and ADMIN
/// grant equally.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{ProjectMember, Role};
use crate::store::Store;

#[derive(Clone)]
pub struct MembershipService {
    store: Arc<dyn Store>,
}

impl MembershipService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// True iff the user holds any membership in the project
    pub async fn has_access(&self, user_id: Uuid, project_id: Uuid) -> Result<bool> {
        Ok(self
            .store
            .find_membership(project_id, user_id)
            .await?
            .is_some())
    }

    /// True iff the user's membership role is MANAGER or ADMIN
    pub async fn has_manage_access(&self, user_id: Uuid, project_id: Uuid) -> Result<bool> {
        Ok(self
            .store
            .find_membership(project_id, user_id)
            .await?
            .map_or(false, |m| m.role.can_manage_project()))
    }

    /// Adds a user to a project
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the project or the user does not exist
    /// - `Error::AlreadyMember` if the pair already has a membership
    pub async fn add_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<ProjectMember> {
        if self.store.find_project(project_id).await?.is_none() {
            return Err(Error::NotFound("Project"));
        }
        if self.store.find_user_by_id(user_id).await?.is_none() {
            return Err(Error::NotFound("User"));
        }

        let member = ProjectMember::new(project_id, user_id, role);
        self.store.insert_membership(&member).await?;

        info!(
            project_id = %project_id,
            user_id = %user_id,
            role = role.as_str(),
            "Member added"
        );
        Ok(member)
    }

    /// Removes a user from a project
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no such membership exists
    pub async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> Result<()> {
        if !self.store.delete_membership(project_id, user_id).await? {
            return Err(Error::NotFound("Membership"));
        }

        info!(project_id = %project_id, user_id = %user_id, "Member removed");
        Ok(())
    }

    /// Memberships of a project, oldest first
    pub async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>> {
        Ok(self.store.list_memberships(project_id).await?)
    }
}
