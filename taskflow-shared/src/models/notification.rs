/// Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message addressed to a single user
///
/// The only mutation is the read flag moving from false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub user_id: Uuid,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, title: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            message,
            user_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
