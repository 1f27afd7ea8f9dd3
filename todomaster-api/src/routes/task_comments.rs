/// Task comment endpoints
///
/// # Endpoints
///
/// - `POST /api/task-comments` - Append a comment
/// - `GET /api/tasks/:task_id/comments` - Comments on a task (newest first)
///
/// Comments are append-only; they are removed only when their task is
/// deleted.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use todomaster_shared::models::{
    task::Task,
    task_comment::{CreateTaskComment, TaskComment},
};
use uuid::Uuid;
use validator::Validate;

/// Comment creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskCommentRequest {
    pub task_id: Uuid,
    pub user_id: Uuid,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

/// Append a comment
///
/// # Errors
///
/// - `400 Bad Request`: empty content
/// - `404 Not Found`: task does not resolve
pub async fn create_task_comment(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskCommentRequest>,
) -> ApiResult<(StatusCode, Json<TaskComment>)> {
    req.validate()?;

    if Task::find_by_id(&state.db, req.task_id).await?.is_none() {
        return Err(ApiError::not_found("Task"));
    }

    let comment = TaskComment::create(
        &state.db,
        CreateTaskComment {
            task_id: req.task_id,
            user_id: req.user_id,
            content: req.content,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Comments on a task, newest first
pub async fn list_task_comments(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskComment>>> {
    if Task::find_by_id(&state.db, task_id).await?.is_none() {
        return Err(ApiError::not_found("Task"));
    }

    let comments = TaskComment::list_by_task(&state.db, task_id).await?;

    Ok(Json(comments))
}
