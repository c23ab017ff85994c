/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for HTTP tests:
/// - An in-memory application with its router
/// - Registered test users with bearer tokens
/// - Request helpers returning status and parsed JSON

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use taskflow_api::app::{build_router, AppState};
use taskflow_api::config::Config;
use taskflow_shared::store::memory::MemoryStore;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

/// A registered user and their access token
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

impl TestUser {
    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl TestContext {
    /// Creates a fresh application with default configuration
    pub fn new() -> Self {
        Self::with_vars(&[])
    }

    /// Creates a fresh application with extra configuration variables
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let config = Config::from_lookup(|name| {
            if name == "JWT_SECRET" {
                return Some(TEST_SECRET.to_string());
            }
            vars.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
        })
        .expect("test configuration is valid");

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), None, config);
        let app = build_router(state.clone());

        Self { app, state, store }
    }

    /// Sends a request and returns the status with the JSON body
    ///
    /// An empty body reads as `Value::Null`.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&TestUser>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user) = auth {
            builder = builder.header("authorization", user.auth_header());
        }

        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, auth: Option<&TestUser>) -> (StatusCode, Value) {
        self.request("GET", uri, auth, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        auth: Option<&TestUser>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("POST", uri, auth, Some(body)).await
    }

    pub async fn patch(
        &self,
        uri: &str,
        auth: Option<&TestUser>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("PATCH", uri, auth, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, auth: Option<&TestUser>) -> (StatusCode, Value) {
        self.request("DELETE", uri, auth, None).await
    }

    /// Registers a user through the API
    pub async fn register(&self, email: &str) -> TestUser {
        let (status, body) = self
            .post(
                "/v1/auth/register",
                None,
                json!({ "email": email, "password": "password123", "name": "Test User" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            token: body["token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a project owned by `owner`, returning its id
    pub async fn create_project(&self, owner: &TestUser, name: &str) -> String {
        let (status, body) = self
            .post("/v1/projects", Some(owner), json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::OK, "project creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a task in a project, returning its id
    pub async fn create_task(&self, user: &TestUser, project_id: &str, title: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/v1/projects/{}/tasks", project_id),
                Some(user),
                json!({ "title": title }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "task creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}
