/// User model
///
/// Users are created on registration (or on first login when auto-provisioning
/// is enabled) and are never hard-deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     email VARCHAR(255) NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     avatar VARCHAR(512),
///     role user_role NOT NULL DEFAULT 'MEMBER',
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL,
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// Email is compared exactly as stored (case-sensitive).

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::membership::Role;

/// User account
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Display name
    pub name: String,

    /// Optional avatar reference (URL or storage key)
    pub avatar: Option<String>,

    /// Directory-wide default role, distinct from per-project roles
    pub role: Role,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a new MEMBER-role user created now
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            avatar: None,
            role: Role::Member,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "a@x.com".to_string(),
            "Alice".to_string(),
            "$argon2id$hash".to_string(),
        );

        assert_eq!(user.role, Role::Member);
        assert!(user.avatar.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            "a@x.com".to_string(),
            "Alice".to_string(),
            "$argon2id$secret".to_string(),
        );

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("a@x.com"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
    }
}
