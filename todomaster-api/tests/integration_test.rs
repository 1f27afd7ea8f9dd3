/// Integration tests for the TodoMaster API
///
/// These tests verify the full request pipeline end-to-end: validation,
/// authentication, persistence, cascade deletes, and the wire error shape.
/// Each test registers its own uniquely-named user and cleans up after
/// itself; all of them skip when `DATABASE_URL` is not set.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_health_endpoint() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (status, body) = ctx.request("GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let email = common::unique_email();

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": email, "password": "hunter2" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["user"]["user_id"].as_str().unwrap().to_string();

    // Same address with different casing and whitespace must collide
    let shouting = format!("  {}  ", email.to_uppercase());
    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": shouting, "password": "other-password" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "USER_ALREADY_EXISTS");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 1);

    ctx.cleanup_user(&user_id).await;
}

#[tokio::test]
async fn test_login_is_generic_about_failures() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (_token, user) = ctx.register_user("correct-password").await;
    let email = user["email"].as_str().unwrap();

    let (wrong_status, wrong_body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": "wrong-password" })),
            None,
        )
        .await;

    let (unknown_status, unknown_body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": common::unique_email(), "password": "whatever" })),
            None,
        )
        .await;

    // Wrong password and unknown account are indistinguishable
    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_body["message"], unknown_body["message"]);
    assert_eq!(wrong_body["error_code"], "INVALID_CREDENTIALS");
    assert_eq!(unknown_body["error_code"], "INVALID_CREDENTIALS");

    ctx.cleanup_user(user["user_id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_create_task_applies_defaults() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (_token, user) = ctx.register_user("hunter2").await;
    let user_id = user["user_id"].as_str().unwrap();

    let task = ctx.create_task(user_id, "Defaulted task").await;

    assert_eq!(task["priority"], "medium");
    assert_eq!(task["is_completed"], false);
    assert!(task["description"].is_null());
    assert!(task["due_date"].is_null());
    assert!(task["task_id"].is_string());
    assert!(task["created_at"].is_string());

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
async fn test_update_task_with_empty_patch_fails() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (_token, user) = ctx.register_user("hunter2").await;
    let user_id = user["user_id"].as_str().unwrap();

    let task = ctx.create_task(user_id, "Untouchable").await;
    let task_id = task["task_id"].as_str().unwrap();

    let (status, body) = ctx
        .request("PUT", &format!("/api/tasks/{task_id}"), Some(json!({})), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "NOTHING_TO_UPDATE");

    // Row must be unchanged
    let (status, fetched) = ctx
        .request("GET", &format!("/api/tasks/{task_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Untouchable");

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
async fn test_update_task_touches_only_supplied_fields() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (_token, user) = ctx.register_user("hunter2").await;
    let user_id = user["user_id"].as_str().unwrap();

    let (status, task) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(json!({
                "user_id": user_id,
                "title": "Original",
                "description": "keep me",
                "priority": "high"
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = task["task_id"].as_str().unwrap();

    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            Some(json!({ "is_completed": true })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_completed"], true);
    assert_eq!(updated["title"], "Original");
    assert_eq!(updated["description"], "keep me");
    assert_eq!(updated["priority"], "high");

    // Explicit null clears a nullable field
    let (status, cleared) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            Some(json!({ "description": null })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["description"].is_null());

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
async fn test_delete_task_cascades_to_dependents() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (_token, user) = ctx.register_user("hunter2").await;
    let user_id = user["user_id"].as_str().unwrap();

    let task = ctx.create_task(user_id, "Doomed task").await;
    let task_id = task["task_id"].as_str().unwrap().to_string();

    // Tag association
    let (status, tag) = ctx
        .request(
            "POST",
            "/api/tags",
            Some(json!({ "user_id": user_id, "name": "doomed" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = ctx
        .request(
            "POST",
            "/api/task-tags",
            Some(json!({ "task_id": task_id, "tag_id": tag["tag_id"] })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // List membership
    let (status, list) = ctx
        .request(
            "POST",
            "/api/task-lists",
            Some(json!({ "user_id": user_id, "name": "Doomed list" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = ctx
        .request(
            "POST",
            "/api/task-list-relations",
            Some(json!({ "list_id": list["list_id"], "task_id": task_id })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Collaboration, comment, reminder
    let (status, _) = ctx
        .request(
            "POST",
            "/api/task-collaborations",
            Some(json!({ "task_id": task_id, "collaborator_email": "friend@example.com" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = ctx
        .request(
            "POST",
            "/api/task-comments",
            Some(json!({ "task_id": task_id, "user_id": user_id, "content": "gone soon" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = ctx
        .request(
            "POST",
            "/api/reminders",
            Some(json!({ "task_id": task_id, "remind_at": "2030-01-01T09:00:00Z" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Delete the task
    let (status, _) = ctx
        .request("DELETE", &format!("/api/tasks/{task_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Task is gone
    let (status, _) = ctx
        .request("GET", &format!("/api/tasks/{task_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // And so is every dependent row
    let task_uuid = uuid::Uuid::parse_str(&task_id).unwrap();
    for table in [
        "task_tags",
        "task_list_relations",
        "task_collaborations",
        "task_comments",
        "reminders",
    ] {
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE task_id = $1"))
                .bind(task_uuid)
                .fetch_one(&ctx.db)
                .await
                .unwrap();
        assert_eq!(count, 0, "{table} still references the deleted task");
    }

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
async fn test_duplicate_association_is_rejected() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (_token, user) = ctx.register_user("hunter2").await;
    let user_id = user["user_id"].as_str().unwrap();

    let task = ctx.create_task(user_id, "Tagged task").await;
    let (status, tag) = ctx
        .request(
            "POST",
            "/api/tags",
            Some(json!({ "user_id": user_id, "name": "once" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let body = json!({ "task_id": task["task_id"], "tag_id": tag["tag_id"] });

    let (status, _) = ctx
        .request("POST", "/api/task-tags", Some(body.clone()), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = ctx
        .request("POST", "/api/task-tags", Some(body), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error_code"], "ASSOCIATION_EXISTS");

    // Exactly one row for the pair
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM task_tags WHERE task_id = $1 AND tag_id = $2",
    )
    .bind(uuid::Uuid::parse_str(task["task_id"].as_str().unwrap()).unwrap())
    .bind(uuid::Uuid::parse_str(tag["tag_id"].as_str().unwrap()).unwrap())
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(count, 1);

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
async fn test_search_pagination_returns_second_row() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (_token, user) = ctx.register_user("hunter2").await;
    let user_id = user["user_id"].as_str().unwrap();

    ctx.create_task(user_id, "Alpha entry").await;
    ctx.create_task(user_id, "Beta entry").await;
    ctx.create_task(user_id, "Gamma entry").await;

    let (status, body) = ctx
        .request(
            "GET",
            &format!(
                "/api/tasks?user_id={user_id}&limit=1&offset=1&sort_by=title&sort_order=asc"
            ),
            None,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Beta entry");

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
async fn test_substring_search_is_case_insensitive() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (_token, user) = ctx.register_user("hunter2").await;
    let user_id = user["user_id"].as_str().unwrap();

    ctx.create_task(user_id, "Buy MILK at the store").await;
    ctx.create_task(user_id, "Walk the dog").await;

    let (status, body) = ctx
        .request(
            "GET",
            &format!("/api/tasks?user_id={user_id}&query=milk"),
            None,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Buy MILK at the store");

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
async fn test_logout_requires_valid_bearer() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (token, user) = ctx.register_user("hunter2").await;

    let (status, body) = ctx.request("POST", "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "AUTH_TOKEN_REQUIRED");

    let (status, body) = ctx
        .request("POST", "/api/auth/logout", None, Some("garbage-token"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_code"], "AUTH_TOKEN_INVALID");

    let (status, _) = ctx
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    ctx.cleanup_user(user["user_id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_password_recovery_does_not_reveal_accounts() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (_token, user) = ctx.register_user("hunter2").await;
    let email = user["email"].as_str().unwrap();

    let sent_before = ctx.notifier.sent().len();

    let (status, known) = ctx
        .request(
            "POST",
            "/api/auth/password-recovery",
            Some(json!({ "email": email })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, unknown) = ctx
        .request(
            "POST",
            "/api/auth/password-recovery",
            Some(json!({ "email": common::unique_email() })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Identical outward response either way
    assert_eq!(known["message"], unknown["message"]);

    // But only the real account triggered a dispatch
    let sent = ctx.notifier.sent();
    assert_eq!(sent.len(), sent_before + 1);
    assert_eq!(sent.last().unwrap().recipient, email);

    ctx.cleanup_user(user["user_id"].as_str().unwrap()).await;
}

#[tokio::test]
async fn test_end_to_end_task_lifecycle() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    // Register
    let email = common::unique_email();
    let (status, registered) = ctx
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": email, "password": "hunter2", "name": "Lifecycle" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = registered["user"]["user_id"].as_str().unwrap().to_string();

    // Login
    let (status, logged_in) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": "hunter2" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(logged_in["auth_token"].is_string());

    // Create
    let (status, task) = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(json!({ "user_id": user_id, "title": "Buy milk" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = task["task_id"].as_str().unwrap().to_string();

    // Read back
    let (status, fetched) = ctx
        .request("GET", &format!("/api/tasks/{task_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Buy milk");
    assert_eq!(fetched["is_completed"], false);
    assert_eq!(fetched["priority"], "medium");

    // Delete
    let (status, _) = ctx
        .request("DELETE", &format!("/api/tasks/{task_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Gone
    let (status, body) = ctx
        .request("GET", &format!("/api/tasks/{task_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "NOT_FOUND");

    ctx.cleanup_user(&user_id).await;
}
