/// User directory
///
/// Account lookup, registration, authentication and profile updates.
///
/// # Login Policy
///
/// By default a login for an unknown email fails exactly like a wrong
/// password. With [`LoginPolicy::register_on_login`] enabled, such a login
/// creates the account instead. A wrong password for an existing account
/// never creates anything under either policy.
///
/// # Validation
///
/// - name: 2 to 255 characters after trimming
/// - email: `local@domain.tld` shape, no whitespace, at most 255 characters,
///   trimmed before storage
/// - password: at least 6 characters
/// - avatar: at most 512 characters
///
/// Emails are compared exactly as stored.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::password::{dummy_verify, hash_password, validate_password, verify_password};
use crate::error::{Error, FieldError, Result};
use crate::models::User;
use crate::store::{RowEdit, Store};

/// Minimum display name length, in characters, after trimming
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum display name length, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum email length, in characters
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Maximum avatar reference length, in characters
pub const MAX_AVATAR_LENGTH: usize = 512;

/// Checks the `local@domain.tld` shape
///
/// The address must contain no whitespace and exactly one `@` with a
/// non-empty local part. The domain must contain a dot with at least one
/// character on either side.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    let length = name.chars().count();
    if length < MIN_NAME_LENGTH {
        errors.push(FieldError::new(
            "name",
            format!("Name must be at least {} characters", MIN_NAME_LENGTH),
        ));
    } else if length > MAX_NAME_LENGTH {
        errors.push(FieldError::new(
            "name",
            format!("Name must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Invalid email format"));
    } else if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.push(FieldError::new(
            "email",
            format!("Email must be at most {} characters", MAX_EMAIL_LENGTH),
        ));
    }
}

fn check_avatar(avatar: &str, errors: &mut Vec<FieldError>) {
    if avatar.chars().count() > MAX_AVATAR_LENGTH {
        errors.push(FieldError::new(
            "avatar",
            format!("Avatar must be at most {} characters", MAX_AVATAR_LENGTH),
        ));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if let Err(reason) = validate_password(password) {
        errors.push(FieldError::new("password", reason));
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::ValidationFailed(errors))
    }
}

/// Default display name for an auto-provisioned account
fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    if local.chars().count() >= MIN_NAME_LENGTH {
        local.to_string()
    } else {
        email.to_string()
    }
}

/// Behaviour of `login` for unknown emails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoginPolicy {
    /// Create an account when a login names an unknown email
    pub register_on_login: bool,
}

/// Partial profile update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// User lookup, registration and authentication
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn Store>,
    policy: LoginPolicy,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn Store>, policy: LoginPolicy) -> Self {
        Self { store, policy }
    }

    /// Active login policy
    pub fn policy(&self) -> LoginPolicy {
        self.policy
    }

    /// Exact-match email lookup
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.store.find_user_by_email(email).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.store.find_user_by_id(id).await?)
    }

    /// Registers a MEMBER-role account
    ///
    /// # Errors
    ///
    /// - `Error::ValidationFailed` for a malformed name, email or password
    /// - `Error::DuplicateEmail` if the email is taken
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<User> {
        let email = email.trim();
        let name = name.trim();

        let mut errors = Vec::new();
        check_email(email, &mut errors);
        check_name(name, &mut errors);
        check_password(password, &mut errors);
        into_result(errors)?;

        if self.store.find_user_by_email(email).await?.is_some() {
            debug!(email = %email, "Registration rejected, email taken");
            return Err(Error::DuplicateEmail);
        }

        let user = User::new(email.to_string(), name.to_string(), hash_password(password)?);

        // Concurrent registrations are caught by the unique constraint
        self.store.insert_user(&user).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials
    ///
    /// Returns `None` for an unknown email and for a wrong password alike.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            dummy_verify(password);
            warn!("Login failed: invalid credentials");
            return Ok(None);
        };

        if verify_password(password, &user.password_hash) {
            debug!(user_id = %user.id, "Credentials accepted");
            Ok(Some(user))
        } else {
            warn!("Login failed: invalid credentials");
            Ok(None)
        }
    }

    /// Authenticates, creating the account if the email is unknown
    ///
    /// `name` defaults to the local part of the email.
    ///
    /// # Errors
    ///
    /// - `Error::Unauthenticated` for a wrong password on an existing account
    /// - any `register` error when creating the account
    pub async fn auto_provision_on_login(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<User> {
        match self.store.find_user_by_email(email).await? {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            Some(_) => {
                warn!("Login failed: invalid credentials");
                Err(Error::Unauthenticated)
            }
            None => {
                let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
                    Some(name) => name.to_string(),
                    None => name_from_email(email.trim()),
                };
                info!("Provisioning account on first login");
                self.register(email, password, &name).await
            }
        }
    }

    /// Login entry point applying the configured [`LoginPolicy`]
    ///
    /// # Errors
    ///
    /// Returns `Error::Unauthenticated` when the credentials are rejected
    pub async fn login(&self, email: &str, password: &str, name: Option<&str>) -> Result<User> {
        if self.policy.register_on_login {
            return self.auto_provision_on_login(email, password, name).await;
        }

        self.authenticate(email, password)
            .await?
            .ok_or(Error::Unauthenticated)
    }

    /// Applies a partial profile update
    ///
    /// Supplied fields are trimmed and validated. `updated_at` only moves if
    /// some field actually changed.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the user does not exist
    /// - `Error::ValidationFailed` for a malformed name, email or avatar
    /// - `Error::DuplicateEmail` if the new email belongs to another user
    pub async fn update_profile(&self, user_id: Uuid, changes: ProfileChanges) -> Result<User> {
        let name = changes.name.map(|name| name.trim().to_string());
        let email = changes.email.map(|email| email.trim().to_string());
        let avatar = changes.avatar;

        let mut errors = Vec::new();
        if let Some(name) = name.as_deref() {
            check_name(name, &mut errors);
        }
        if let Some(email) = email.as_deref() {
            check_email(email, &mut errors);
        }
        if let Some(avatar) = avatar.as_deref() {
            check_avatar(avatar, &mut errors);
        }
        into_result(errors)?;

        let edit: RowEdit<User, bool> = Box::new(move |user: &mut User| {
            let mut changed = false;
            if let Some(name) = name {
                if user.name != name {
                    user.name = name;
                    changed = true;
                }
            }
            if let Some(email) = email {
                if user.email != email {
                    user.email = email;
                    changed = true;
                }
            }
            if let Some(avatar) = avatar {
                if user.avatar.as_deref() != Some(avatar.as_str()) {
                    user.avatar = Some(avatar);
                    changed = true;
                }
            }

            if changed {
                user.updated_at = Utc::now();
            }
            changed
        });

        // The write enforces email uniqueness
        let user = self
            .store
            .modify_user(user_id, edit)
            .await?
            .ok_or(Error::NotFound("User"))?;

        info!(user_id = %user.id, "Profile update applied");
        Ok(user)
    }
}
