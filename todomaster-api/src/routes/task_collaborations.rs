/// Task collaboration endpoints
///
/// # Endpoints
///
/// - `POST /api/task-collaborations` - Invite a collaborator by email
/// - `DELETE /api/task-collaborations/:task_id/:collaborator_email` - Remove
/// - `GET /api/tasks/:task_id/collaborations` - Collaborators on a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use todomaster_shared::models::{
    task::Task, task_collaboration::TaskCollaboration, user::normalize_email,
};
use uuid::Uuid;
use validator::Validate;

/// Collaboration creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskCollaborationRequest {
    pub task_id: Uuid,

    #[validate(email(message = "Invalid email format"))]
    pub collaborator_email: String,
}

/// Invite a collaborator
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or the invitation already exists
/// - `404 Not Found`: task does not resolve
pub async fn create_task_collaboration(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskCollaborationRequest>,
) -> ApiResult<(StatusCode, Json<TaskCollaboration>)> {
    req.validate()?;

    let email = normalize_email(&req.collaborator_email);

    if Task::find_by_id(&state.db, req.task_id).await?.is_none() {
        return Err(ApiError::not_found("Task"));
    }

    if TaskCollaboration::exists(&state.db, req.task_id, &email).await? {
        return Err(ApiError::Conflict {
            message: "Collaborator is already invited to this task".to_string(),
            error_code: "ASSOCIATION_EXISTS",
        });
    }

    let collaboration = TaskCollaboration::create(&state.db, req.task_id, &email).await?;

    Ok((StatusCode::CREATED, Json(collaboration)))
}

/// Remove a collaborator
pub async fn delete_task_collaboration(
    State(state): State<AppState>,
    Path((task_id, collaborator_email)): Path<(Uuid, String)>,
) -> ApiResult<StatusCode> {
    let email = normalize_email(&collaborator_email);

    let deleted = TaskCollaboration::delete(&state.db, task_id, &email).await?;

    if !deleted {
        return Err(ApiError::not_found("Task collaboration"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Collaborators on a task
pub async fn list_task_collaborations(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskCollaboration>>> {
    if Task::find_by_id(&state.db, task_id).await?.is_none() {
        return Err(ApiError::not_found("Task"));
    }

    let collaborations = TaskCollaboration::list_by_task(&state.db, task_id).await?;

    Ok(Json(collaborations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_bad_email() {
        let req = CreateTaskCollaborationRequest {
            task_id: Uuid::new_v4(),
            collaborator_email: "not-an-email".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
