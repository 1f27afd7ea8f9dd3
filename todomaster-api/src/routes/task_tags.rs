/// Task-tag association endpoints
///
/// # Endpoints
///
/// - `POST /api/task-tags` - Attach a tag to a task
/// - `DELETE /api/task-tags/:task_id/:tag_id` - Detach a tag
/// - `GET /api/tasks/:task_id/tags` - Tags attached to a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use todomaster_shared::models::{
    tag::Tag,
    task::Task,
    task_tag::TaskTag,
};
use uuid::Uuid;

/// Association creation request
#[derive(Debug, Deserialize)]
pub struct CreateTaskTagRequest {
    pub task_id: Uuid,
    pub tag_id: Uuid,
}

/// Attach a tag to a task
///
/// # Errors
///
/// - `400 Bad Request`: the pair already exists
/// - `404 Not Found`: task or tag does not resolve
pub async fn create_task_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskTagRequest>,
) -> ApiResult<(StatusCode, Json<TaskTag>)> {
    if Task::find_by_id(&state.db, req.task_id).await?.is_none() {
        return Err(ApiError::not_found("Task"));
    }
    if Tag::find_by_id(&state.db, req.tag_id).await?.is_none() {
        return Err(ApiError::not_found("Tag"));
    }

    if TaskTag::exists(&state.db, req.task_id, req.tag_id).await? {
        return Err(ApiError::Conflict {
            message: "Tag is already attached to this task".to_string(),
            error_code: "ASSOCIATION_EXISTS",
        });
    }

    let association = TaskTag::create(&state.db, req.task_id, req.tag_id).await?;

    Ok((StatusCode::CREATED, Json(association)))
}

/// Detach a tag from a task
pub async fn delete_task_tag(
    State(state): State<AppState>,
    Path((task_id, tag_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let deleted = TaskTag::delete(&state.db, task_id, tag_id).await?;

    if !deleted {
        return Err(ApiError::not_found("Task tag association"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Tags attached to a task
pub async fn list_task_tags(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Tag>>> {
    if Task::find_by_id(&state.db, task_id).await?.is_none() {
        return Err(ApiError::not_found("Task"));
    }

    let tags = TaskTag::tags_for_task(&state.db, task_id).await?;

    Ok(Json(tags))
}
