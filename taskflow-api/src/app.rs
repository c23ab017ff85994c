/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskflow_api::{app::AppState, config::Config};
/// use taskflow_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), None, config);
/// let app = taskflow_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskflow_shared::{
    auth::{
        jwt::TokenService,
        middleware::{identity_middleware, IdentityGate},
    },
    services::{
        access::MembershipService, notifications::NotificationService,
        projects::ProjectService, tasks::TaskService, users::UserDirectory,
    },
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Services hold `Arc`s internally so cloning stays shallow.
#[derive(Clone)]
pub struct AppState {
    pub users: UserDirectory,
    pub members: MembershipService,
    pub projects: ProjectService,
    pub tasks: TaskService,
    pub notifications: NotificationService,
    pub tokens: Arc<TokenService>,

    /// Storage backend, shared with the identity gate
    pub store: Arc<dyn Store>,

    /// Database pool when running against Postgres
    pub db: Option<PgPool>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state over a storage backend
    pub fn new(store: Arc<dyn Store>, db: Option<PgPool>, config: Config) -> Self {
        let tokens = Arc::new(TokenService::new(config.jwt.token_config()));

        Self {
            users: UserDirectory::new(store.clone(), config.policy.login),
            members: MembershipService::new(store.clone()),
            projects: ProjectService::new(store.clone()),
            tasks: TaskService::new(store.clone(), config.policy.activity_actor),
            notifications: NotificationService::new(store.clone()),
            tokens,
            store,
            db,
            config: Arc::new(config),
        }
    }

    /// Identity resolver for the request middleware
    pub fn identity_gate(&self) -> IdentityGate {
        IdentityGate::new(self.tokens.clone(), self.store.clone())
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /v1/
///     ├── /auth/                       # register, login, refresh (public)
///     ├── /me                          # current user profile
///     ├── /projects[/:id]              # projects, stats, members
///     │   ├── /tasks                   # list and create tasks
///     │   └── /activities              # project activity feed
///     ├── /tasks/:id                   # task detail, comments, activities
///     └── /notifications               # caller's notifications
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Identity resolution, which attaches an `AuthContext` to every request
///
/// Handlers decide for themselves whether they need an identity.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/:id/stats", get(routes::projects::project_stats))
        .route(
            "/:id/members",
            get(routes::projects::list_members).post(routes::projects::add_member),
        )
        .route(
            "/:id/members/:user_id",
            axum::routing::delete(routes::projects::remove_member),
        )
        .route(
            "/:id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/:id/activities", get(routes::tasks::project_activities));

    let task_routes = Router::new()
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/:id/comments",
            get(routes::tasks::list_comments).post(routes::tasks::add_comment),
        )
        .route("/:id/activities", get(routes::tasks::task_activities));

    let notification_routes = Router::new()
        .route("/", get(routes::notifications::list_notifications))
        .route("/:id/read", post(routes::notifications::mark_read));

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .route("/me", get(routes::me::get_me).patch(routes::me::update_me))
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/notifications", notification_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let gate = state.identity_gate();

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(axum::middleware::from_fn_with_state(gate, identity_middleware))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
