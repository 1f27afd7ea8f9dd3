/// Task endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks` - Search tasks
/// - `POST /api/tasks` - Create task
/// - `GET /api/tasks/:task_id` - Fetch task
/// - `PUT /api/tasks/:task_id` - Partial update
/// - `DELETE /api/tasks/:task_id` - Delete task and dependents
///
/// Updates touch only the fields present in the payload; an empty patch is
/// rejected rather than silently succeeding. Deletes cascade to every table
/// referencing the task.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
};
use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use todomaster_shared::models::{
    task::{CreateTask, Priority, Task, TaskFilter, TaskSortBy, UpdateTask},
    SortOrder,
};
use uuid::Uuid;
use validator::Validate;

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Owning user
    pub user_id: Uuid,

    /// Task title
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Completion flag (defaults to false)
    #[serde(default)]
    pub is_completed: bool,

    /// Priority (defaults to "medium")
    #[serde(default)]
    pub priority: Priority,

    /// Optional due date (RFC 3339)
    pub due_date: Option<DateTime<Utc>>,
}

/// Task update request
///
/// Absent fields are left untouched; `description` and `due_date` accept an
/// explicit `null` to clear the stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,

    pub is_completed: Option<bool>,

    pub priority: Option<Priority>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Task search parameters
#[derive(Debug, Deserialize, Validate)]
pub struct SearchTasksParams {
    /// Substring matched against title and description (case-insensitive)
    pub query: Option<String>,

    /// Restrict to one owner
    pub user_id: Option<Uuid>,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be positive"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "offset must be non-negative"))]
    pub offset: i64,

    #[serde(default = "default_sort_by")]
    pub sort_by: TaskSortBy,

    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
}

fn default_limit() -> i64 {
    10
}

fn default_sort_by() -> TaskSortBy {
    TaskSortBy::CreatedAt
}

fn default_sort_order() -> SortOrder {
    SortOrder::Desc
}

/// Search tasks
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks?query=milk&user_id=...&limit=10&offset=0&sort_by=created_at&sort_order=desc
/// ```
pub async fn search_tasks(
    State(state): State<AppState>,
    Query(params): Query<SearchTasksParams>,
) -> ApiResult<Json<Vec<Task>>> {
    params.validate()?;

    let tasks = Task::search(
        &state.db,
        TaskFilter {
            query: params.query,
            user_id: params.user_id,
            limit: params.limit,
            offset: params.offset,
            sort_by: params.sort_by,
            sort_order: params.sort_order,
        },
    )
    .await?;

    Ok(Json(tasks))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Content-Type: application/json
///
/// { "user_id": "...", "title": "Buy milk", "priority": "high" }
/// ```
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: req.user_id,
            title: req.title,
            description: req.description,
            is_completed: req.is_completed,
            priority: req.priority,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Fetch a task
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;

    Ok(Json(task))
}

/// Partially update a task
///
/// # Errors
///
/// - `400 Bad Request`: empty patch or validation failure
/// - `404 Not Found`: id does not resolve
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let update = UpdateTask {
        user_id: req.user_id,
        title: req.title,
        description: req.description,
        is_completed: req.is_completed,
        priority: req.priority,
        due_date: req.due_date,
    };

    if update.is_empty() {
        return Err(ApiError::NothingToUpdate);
    }

    let task = Task::update(&state.db, task_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;

    Ok(Json(task))
}

/// Delete a task and everything referencing it
///
/// Tag associations, list memberships, collaborations, comments, and
/// reminders go with the task, all in one transaction.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete_cascade(&state.db, task_id).await?;

    if !deleted {
        return Err(ApiError::not_found("Task"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_defaults() {
        let json = r#"{"user_id":"5f0c1f5a-0001-4b6e-9d3a-1a2b3c4d5e6f","title":"Buy milk"}"#;
        let req: CreateTaskRequest = serde_json::from_str(json).unwrap();

        assert!(!req.is_completed);
        assert_eq!(req.priority, Priority::Medium);
        assert!(req.description.is_none());
        assert!(req.due_date.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_task_rejects_unknown_priority() {
        let json = r#"{"user_id":"5f0c1f5a-0001-4b6e-9d3a-1a2b3c4d5e6f","title":"x","priority":"urgent"}"#;
        assert!(serde_json::from_str::<CreateTaskRequest>(json).is_err());
    }

    #[test]
    fn test_create_task_rejects_empty_title() {
        let json = r#"{"user_id":"5f0c1f5a-0001-4b6e-9d3a-1a2b3c4d5e6f","title":""}"#;
        let req: CreateTaskRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_distinguishes_absent_from_null() {
        let absent: UpdateTaskRequest = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert!(absent.description.is_none());

        let cleared: UpdateTaskRequest =
            serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateTaskRequest =
            serde_json::from_str(r#"{"description":"details"}"#).unwrap();
        assert_eq!(set.description, Some(Some("details".to_string())));
    }

    #[test]
    fn test_empty_patch_detected() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        let update = UpdateTask {
            user_id: req.user_id,
            title: req.title,
            description: req.description,
            is_completed: req.is_completed,
            priority: req.priority,
            due_date: req.due_date,
        };
        assert!(update.is_empty());
    }

    #[test]
    fn test_search_params_defaults() {
        let params: SearchTasksParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limit, 10);
        assert_eq!(params.offset, 0);
        assert_eq!(params.sort_by, TaskSortBy::CreatedAt);
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_search_params_rejects_unknown_sort_column() {
        let bad_sort = serde_json::from_str::<SearchTasksParams>(r#"{"sort_by":"priority"}"#);
        assert!(bad_sort.is_err());
    }

    #[test]
    fn test_create_task_rejects_invalid_date() {
        let json = r#"{"user_id":"5f0c1f5a-0001-4b6e-9d3a-1a2b3c4d5e6f","title":"x","due_date":"not-a-date"}"#;
        assert!(serde_json::from_str::<CreateTaskRequest>(json).is_err());
    }
}
