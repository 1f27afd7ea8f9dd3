/// Common test utilities for integration tests
///
/// These tests exercise the full router against a real PostgreSQL database.
/// They are skipped gracefully when `DATABASE_URL` is not set, so the unit
/// test suite stays runnable without infrastructure.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use todomaster_api::app::{build_router, AppState};
use todomaster_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use todomaster_shared::db::bootstrap;
use todomaster_shared::notify::MockNotifier;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub notifier: Arc<MockNotifier>,
}

impl TestContext {
    /// Creates a new test context against the database in `DATABASE_URL`
    ///
    /// Returns `None` (and the caller should skip) when the variable is not
    /// set or the database is unreachable.
    pub async fn new() -> Option<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("DATABASE_URL not set; skipping integration test");
                return None;
            }
        };

        let db = match PgPool::connect(&database_url).await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("Database unreachable ({e}); skipping integration test");
                return None;
            }
        };

        bootstrap::initialize(&db).await.ok()?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origin: "*".to_string(),
                body_limit_bytes: 5 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "integration-test-secret-0123456789abcdef".to_string(),
            },
        };

        let notifier = Arc::new(MockNotifier::new());
        let state = AppState::new(db.clone(), config, notifier.clone());
        let app = build_router(state);

        Some(TestContext { db, app, notifier })
    }

    /// Sends a JSON request through the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
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

    /// Registers a fresh user with a unique email
    ///
    /// Returns (auth_token, user json).
    pub async fn register_user(&self, password: &str) -> (String, Value) {
        let email = unique_email();
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({
                    "email": email,
                    "password": password,
                    "name": "Test User"
                })),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
        let token = body["auth_token"].as_str().unwrap().to_string();
        (token, body["user"].clone())
    }

    /// Creates a task for the given user and returns its json
    pub async fn create_task(&self, user_id: &str, title: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                "/api/tasks",
                Some(serde_json::json!({ "user_id": user_id, "title": title })),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "task creation failed: {body}");
        body
    }

    /// Removes a test user and everything it owns
    pub async fn cleanup_user(&self, user_id: &str) {
        let user_id = Uuid::parse_str(user_id).unwrap();

        for table in [
            "task_tags",
            "task_list_relations",
            "task_collaborations",
            "task_comments",
            "reminders",
        ] {
            sqlx::query(&format!(
                "DELETE FROM {table} WHERE task_id IN (SELECT task_id FROM tasks WHERE user_id = $1)"
            ))
            .bind(user_id)
            .execute(&self.db)
            .await
            .unwrap();
        }

        for table in ["tasks", "task_lists", "tags"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE user_id = $1"))
                .bind(user_id)
                .execute(&self.db)
                .await
                .unwrap();
        }

        sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .unwrap();
    }
}

/// Generates an email no other test run has used
pub fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}
