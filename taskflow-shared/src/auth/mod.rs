/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the password policy
/// - [`jwt`]: Access and refresh token issuance and verification
/// - [`middleware`]: Per-request identity resolution from bearer tokens
/// - [`authorization`]: Identity and project-permission checks
///
/// # Example
///
/// ```
/// use taskflow_shared::auth::jwt::{TokenConfig, TokenService};
/// use taskflow_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// let tokens = TokenService::new(TokenConfig::new("a-secret-that-is-at-least-32-bytes!"));
/// let token = tokens.issue_access(Uuid::new_v4())?;
/// assert!(tokens.verify_access(&token).is_some());
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
