/// Domain error kinds
///
/// Every service operation returns [`Result<T>`]. The transport layer maps each
/// kind to a response uniformly; nothing here knows about HTTP.
///
/// Absence is not an error where an operation is defined as a lookup
/// (`find_by_email`, `verify`), those return `Option` instead.

use serde::{Deserialize, Serialize};

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::{Constraint, StoreError};

/// Result alias used across the domain services
pub type Result<T> = std::result::Result<T, Error>;

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as exposed to clients
    pub field: String,

    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Domain error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No valid caller identity
    #[error("Authentication required")]
    Unauthenticated,

    /// Valid identity without the required project permission
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Referenced entity is absent
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Email already belongs to another user
    #[error("Email already registered")]
    DuplicateEmail,

    /// Membership row already exists for the pair
    #[error("User is already a member of this project")]
    AlreadyMember,

    /// One or more malformed fields
    #[error("Validation failed: {}", format_fields(.0))]
    ValidationFailed(Vec<FieldError>),

    /// Storage or unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Shorthand for a single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ValidationFailed(vec![FieldError::new(field, message)])
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(Constraint::UserEmail) => Error::DuplicateEmail,
            StoreError::Conflict(Constraint::ProjectMember) => Error::AlreadyMember,
            StoreError::Conflict(Constraint::Other(name)) => {
                Error::Internal(format!("Constraint violation: {}", name))
            }
            StoreError::Database(e) => Error::Internal(format!("Database error: {}", e)),
            StoreError::Unavailable(msg) => Error::Internal(msg),
        }
    }
}

impl From<JwtError> for Error {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidToken => Error::Unauthenticated,
            JwtError::CreateError(msg) => Error::Internal(msg),
        }
    }
}

impl From<PasswordError> for Error {
    fn from(err: PasswordError) -> Self {
        Error::Internal(err.to_string())
    }
}
