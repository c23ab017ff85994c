/// Identity resolution middleware for Axum
///
/// Every request passes through [`identity_middleware`], which reads the
/// `Authorization` header, verifies a `Bearer` access token and loads the
/// subject's user row. The outcome is stored as an [`AuthContext`] request
/// extension whether or not a user was found; missing or malformed
/// credentials are not an error at this stage. Handlers decide whether they
/// need an identity via [`crate::auth::authorization::require_user`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Router};
/// use taskflow_shared::auth::jwt::{TokenConfig, TokenService};
/// use taskflow_shared::auth::middleware::{identity_middleware, AuthContext, IdentityGate};
/// use taskflow_shared::store::memory::MemoryStore;
///
/// async fn whoami(auth: AuthContext) -> String {
///     auth.user().map(|u| u.email.clone()).unwrap_or_else(|| "anonymous".into())
/// }
///
/// let gate = IdentityGate::new(
///     Arc::new(TokenService::new(TokenConfig::new("a-secret-that-is-at-least-32-bytes!"))),
///     Arc::new(MemoryStore::new()),
/// );
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn_with_state(gate, identity_middleware));
/// ```

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use super::jwt::TokenService;
use crate::error::Result;
use crate::models::User;
use crate::store::Store;

/// Per-request caller identity
///
/// Added to request extensions by [`identity_middleware`]. Extracting it in a
/// handler never fails: a request without the middleware reads as anonymous.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    user: Option<User>,
}

impl AuthContext {
    /// Context for a resolved user
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Context with no identity
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// The resolved user, if any
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Extracts the token from an `Authorization` header value
///
/// Only `Bearer <token>` is recognised. Any other scheme, a missing token or
/// embedded whitespace yields `None`.
pub fn parse_bearer(header_value: Option<&str>) -> Option<&str> {
    let token = header_value?.strip_prefix("Bearer ")?.trim();

    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }

    Some(token)
}

/// State needed to resolve identities
#[derive(Clone)]
pub struct IdentityGate {
    tokens: Arc<TokenService>,
    store: Arc<dyn Store>,
}

impl IdentityGate {
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn Store>) -> Self {
        Self { tokens, store }
    }

    /// Resolves an `Authorization` header value to a caller identity
    ///
    /// An absent, malformed, expired or refresh token, or a subject without a
    /// user row, all resolve to an anonymous context.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` only when the user lookup itself fails
    pub async fn resolve(&self, header_value: Option<&str>) -> Result<AuthContext> {
        let Some(token) = parse_bearer(header_value) else {
            return Ok(AuthContext::anonymous());
        };

        let Some(claims) = self.tokens.verify_access(token) else {
            return Ok(AuthContext::anonymous());
        };

        match self.store.find_user_by_id(claims.sub).await? {
            Some(user) => {
                debug!(user_id = %user.id, "Resolved caller identity");
                Ok(AuthContext::authenticated(user))
            }
            None => {
                debug!(user_id = %claims.sub, "Token subject has no user row");
                Ok(AuthContext::anonymous())
            }
        }
    }
}

/// Middleware attaching an [`AuthContext`] to every request
///
/// Intended for `axum::middleware::from_fn_with_state`.
pub async fn identity_middleware(
    State(gate): State<IdentityGate>,
    mut req: Request,
    next: Next,
) -> Response {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match gate.resolve(header_value).await {
        Ok(context) => {
            req.extensions_mut().insert(context);
            next.run(req).await
        }
        Err(e) => {
            error!(error = %e, "Identity resolution failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred",
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenConfig;
    use crate::store::memory::MemoryStore;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(parse_bearer(Some("Bearer ")), None);
        assert_eq!(parse_bearer(Some("Basic dXNlcjpwdw==")), None);
        assert_eq!(parse_bearer(Some("bearer abc")), None);
        assert_eq!(parse_bearer(Some("Bearer a b")), None);
        assert_eq!(parse_bearer(Some("abc.def.ghi")), None);
        assert_eq!(parse_bearer(None), None);
    }

    #[tokio::test]
    async fn test_resolve_known_user() {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenService::new(TokenConfig::new(SECRET)));
        let user = User::new("a@x.com".into(), "Alice".into(), "hash".into());
        store.insert_user(&user).await.unwrap();

        let gate = IdentityGate::new(tokens.clone(), store);
        let header = format!("Bearer {}", tokens.issue_access(user.id).unwrap());

        let context = gate.resolve(Some(&header)).await.unwrap();
        assert_eq!(context.user().map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_resolve_unknown_or_bad_credentials_is_anonymous() {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenService::new(TokenConfig::new(SECRET)));
        let gate = IdentityGate::new(tokens.clone(), store);

        // Valid token for a subject with no user row
        let header = format!("Bearer {}", tokens.issue_access(Uuid::new_v4()).unwrap());
        assert!(gate.resolve(Some(&header)).await.unwrap().user().is_none());

        // Refresh tokens are not identities
        let header = format!("Bearer {}", tokens.issue_refresh(Uuid::new_v4()).unwrap());
        assert!(gate.resolve(Some(&header)).await.unwrap().user().is_none());

        assert!(gate.resolve(Some("Bearer garbage")).await.unwrap().user().is_none());
        assert!(gate.resolve(None).await.unwrap().user().is_none());
    }
}
