/// JWT issuance and verification
///
/// Tokens are signed with an HMAC algorithm (HS256 by default) using a
/// process-wide secret. Keys are derived once when the [`TokenService`] is
/// built; rotating the secret invalidates all outstanding tokens.
///
/// # Token Types
///
/// - **Access Token**: short-lived (30 minutes), accepted as bearer identity
/// - **Refresh Token**: long-lived (7 days), exchanged for new access tokens
///
/// # Validation
///
/// Signature, issuer, `nbf` and `exp` are checked with zero leeway, so a
/// token stops verifying the second its expiry passes.
///
/// # Example
///
/// ```
/// use taskflow_shared::auth::jwt::{TokenConfig, TokenService};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(TokenConfig::new("a-secret-that-is-at-least-32-bytes!"));
/// let user_id = Uuid::new_v4();
///
/// let token = tokens.issue_access(user_id)?;
/// let claims = tokens.verify(&token).expect("fresh token verifies");
/// assert_eq!(claims.sub, user_id);
///
/// assert!(tokens.verify("not-a-jwt").is_none());
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub use jsonwebtoken::Algorithm;

/// Issuer claim stamped on every token
pub const ISSUER: &str = "taskflow";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token failed verification or has the wrong type
    #[error("Invalid or expired token")]
    InvalidToken,
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Parses a configured algorithm name
///
/// Only the HMAC family is supported since signing uses a shared secret.
pub fn parse_algorithm(name: &str) -> Option<Algorithm> {
    match name.trim().to_ascii_uppercase().as_str() {
        "HS256" => Some(Algorithm::HS256),
        "HS384" => Some(Algorithm::HS384),
        "HS512" => Some(Algorithm::HS512),
        _ => None,
    }
}

/// JWT claims
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "taskflow")
/// - `iat`: Issued at timestamp
/// - `nbf`: Not before timestamp
/// - `exp`: Absolute expiration timestamp
///
/// # Custom Claims
///
/// - `token_type`: Access or refresh token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims valid from now for `ttl`
    pub fn new(subject: Uuid, token_type: TokenType, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type,
        }
    }
}

/// Token settings, loaded once at startup
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC signing secret
    pub secret: String,

    /// Signing algorithm
    ///
    /// Default: HS256
    pub algorithm: Algorithm,

    /// Access token lifetime
    ///
    /// Default: 30 minutes
    pub access_ttl: Duration,

    /// Refresh token lifetime
    ///
    /// Default: 7 days
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Default settings for the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: Duration::minutes(30),
            refresh_ttl: Duration::days(7),
        }
    }
}

/// Signs and verifies tokens with pre-built keys
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm: config.algorithm,
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    /// Access token lifetime
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Signs a token for `subject` expiring after `ttl`
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if encoding fails
    pub fn issue(
        &self,
        subject: Uuid,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(subject, token_type, ttl);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Signs an access token with the configured TTL
    pub fn issue_access(&self, subject: Uuid) -> Result<String, JwtError> {
        self.issue(subject, TokenType::Access, self.access_ttl)
    }

    /// Signs a refresh token with the configured TTL
    pub fn issue_refresh(&self, subject: Uuid) -> Result<String, JwtError> {
        self.issue(subject, TokenType::Refresh, self.refresh_ttl)
    }

    /// Decodes a token of either type
    ///
    /// Returns `None` on a bad signature, malformed input, wrong issuer or
    /// expiry. Never panics on untrusted input.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(error = %e, "Token rejected");
                None
            }
        }
    }

    /// Decodes a token and requires it to be an access token
    pub fn verify_access(&self, token: &str) -> Option<Claims> {
        self.verify(token)
            .filter(|claims| claims.token_type == TokenType::Access)
    }

    /// Exchanges a valid refresh token for a new access token
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidToken` if the token does not verify or is not
    /// a refresh token
    pub fn refresh(&self, refresh_token: &str) -> Result<String, JwtError> {
        let claims = self
            .verify(refresh_token)
            .filter(|claims| claims.token_type == TokenType::Refresh)
            .ok_or(JwtError::InvalidToken)?;

        self.issue_access(claims.sub)
    }
}
