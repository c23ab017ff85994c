/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `me`: Current user profile
/// - `projects`: Projects, their stats and members
/// - `tasks`: Tasks, comments and activity feeds
/// - `notifications`: The caller's notifications

pub mod auth;
pub mod health;
pub mod me;
pub mod notifications;
pub mod projects;
pub mod tasks;

use serde::Serialize;

/// Acknowledgement body for deletions and state flips
///
/// Serializes as a single-key object such as `{"deleted": true}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ack {
    Deleted(bool),
    Removed(bool),
    Read(bool),
}
