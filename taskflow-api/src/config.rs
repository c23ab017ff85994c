/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `DATABASE_URL`: PostgreSQL connection string (optional, in-memory store when unset)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 characters)
/// - `JWT_ALGORITHM`: HS256, HS384 or HS512 (default: HS256)
/// - `JWT_ACCESS_TTL_MINUTES`: Access token lifetime, 1 to 10080 (default: 30)
/// - `JWT_REFRESH_TTL_DAYS`: Refresh token lifetime, 1 to 365 (default: 7)
/// - `AUTH_REGISTER_ON_LOGIN`: Create accounts on first login (default: false)
/// - `ACTIVITY_ACTOR`: `caller` or `assignee` (default: caller)
/// - `RUST_LOG`: Log filter (default: taskflow_api=debug,tower_http=debug)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for plain text
///
/// # Example
///
/// ```no_run
/// use taskflow_api::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;

use taskflow_shared::auth::jwt::{parse_algorithm, Algorithm, TokenConfig};
use taskflow_shared::services::tasks::ActivityAttribution;
use taskflow_shared::services::users::LoginPolicy;

/// Minimum accepted JWT secret length
pub const MIN_SECRET_LENGTH: usize = 32;

/// Accepted access token lifetimes, in minutes
pub const ACCESS_TTL_MINUTES: std::ops::RangeInclusive<i64> = 1..=10_080;

/// Accepted refresh token lifetimes, in days
pub const REFRESH_TTL_DAYS: std::ops::RangeInclusive<i64> = 1..=365;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("JWT_SECRET must be at least 32 characters long")]
    WeakSecret,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Domain behaviour switches
    pub policy: PolicyConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL, `None` selects the in-memory store
    pub url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    pub algorithm: Algorithm,

    pub access_ttl_minutes: i64,

    pub refresh_ttl_days: i64,
}

/// Domain behaviour switches
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyConfig {
    pub login: LoginPolicy,
    pub activity_actor: ActivityAttribution,
}

impl JwtConfig {
    /// Token service settings
    pub fn token_config(&self) -> TokenConfig {
        let mut config = TokenConfig::new(self.secret.clone());
        config.algorithm = self.algorithm;
        config.access_ttl = chrono::Duration::minutes(self.access_ttl_minutes);
        config.refresh_ttl = chrono::Duration::days(self.refresh_ttl_days);
        config
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

fn parse_in_range(
    name: &'static str,
    value: Option<String>,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
) -> Result<i64, ConfigError> {
    let raw = value.clone();
    let parsed = parse_number(name, value, default)?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: raw.unwrap_or_default(),
        })
    }
}

fn parse_bool(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off" | "") => Ok(false),
        Some(_) => Err(ConfigError::Invalid {
            name,
            value: value.unwrap_or_default(),
        }),
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is honoured.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - Environment variables have invalid values
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_number("API_PORT", lookup("API_PORT"), 8080u16)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let max_connections =
            parse_number("DATABASE_MAX_CONNECTIONS", lookup("DATABASE_MAX_CONNECTIONS"), 10u32)?;

        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if secret.chars().count() < MIN_SECRET_LENGTH {
            return Err(ConfigError::WeakSecret);
        }

        let algorithm = match lookup("JWT_ALGORITHM") {
            None => Algorithm::HS256,
            Some(raw) => parse_algorithm(&raw).ok_or(ConfigError::Invalid {
                name: "JWT_ALGORITHM",
                value: raw,
            })?,
        };

        let access_ttl_minutes = parse_in_range(
            "JWT_ACCESS_TTL_MINUTES",
            lookup("JWT_ACCESS_TTL_MINUTES"),
            30,
            ACCESS_TTL_MINUTES,
        )?;
        let refresh_ttl_days = parse_in_range(
            "JWT_REFRESH_TTL_DAYS",
            lookup("JWT_REFRESH_TTL_DAYS"),
            7,
            REFRESH_TTL_DAYS,
        )?;

        let register_on_login =
            parse_bool("AUTH_REGISTER_ON_LOGIN", lookup("AUTH_REGISTER_ON_LOGIN"))?;

        let activity_actor = match lookup("ACTIVITY_ACTOR") {
            None => ActivityAttribution::default(),
            Some(raw) => ActivityAttribution::parse(&raw).ok_or(ConfigError::Invalid {
                name: "ACTIVITY_ACTOR",
                value: raw,
            })?,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret,
                algorithm,
                access_ttl_minutes,
                refresh_ttl_days,
            },
            policy: PolicyConfig {
                login: LoginPolicy { register_on_login },
                activity_actor,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
