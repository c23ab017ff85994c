/// Per-user notifications

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::Notification;
use crate::store::Store;

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn Store>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Notifications addressed to the user, newest first
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        Ok(self.store.list_notifications(user_id).await?)
    }

    /// Records a new unread notification
    pub async fn create(&self, user_id: Uuid, title: &str, message: &str) -> Result<Notification> {
        let notification = Notification::new(user_id, title.to_string(), message.to_string());
        self.store.insert_notification(&notification).await?;

        debug!(notification_id = %notification.id, user_id = %user_id, "Notification created");
        Ok(notification)
    }

    /// Marks one of the user's notifications as read
    ///
    /// Marking an already-read notification succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the notification does not exist or belongs
    /// to another user
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<()> {
        if !self
            .store
            .mark_notification_read(notification_id, user_id)
            .await?
        {
            return Err(Error::NotFound("Notification"));
        }

        Ok(())
    }
}
