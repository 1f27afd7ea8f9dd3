/// Task list endpoints
///
/// # Endpoints
///
/// - `GET /api/task-lists` - Search lists
/// - `POST /api/task-lists` - Create list
/// - `GET /api/task-lists/:list_id` - Fetch list
/// - `PUT /api/task-lists/:list_id` - Partial update
/// - `DELETE /api/task-lists/:list_id` - Delete list and its memberships
/// - `GET /api/task-lists/:list_id/tasks` - Tasks in the list
/// - `POST /api/task-list-relations` - Add a task to a list
/// - `DELETE /api/task-list-relations/:list_id/:task_id` - Remove a task
///
/// Deleting a list removes its memberships, never the tasks themselves.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use todomaster_shared::models::{
    task::Task,
    task_list::{CreateTaskList, TaskList, TaskListFilter, TaskListSortBy, UpdateTaskList},
    task_list_relation::TaskListRelation,
    SortOrder,
};
use uuid::Uuid;
use validator::Validate;

/// List creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskListRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}

/// List update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskListRequest {
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
}

/// List search parameters
#[derive(Debug, Deserialize, Validate)]
pub struct SearchTaskListsParams {
    pub query: Option<String>,
    pub user_id: Option<Uuid>,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be positive"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "offset must be non-negative"))]
    pub offset: i64,

    #[serde(default = "default_sort_by")]
    pub sort_by: TaskListSortBy,

    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
}

/// Membership creation request
#[derive(Debug, Deserialize)]
pub struct CreateTaskListRelationRequest {
    pub list_id: Uuid,
    pub task_id: Uuid,
}

fn default_limit() -> i64 {
    10
}

fn default_sort_by() -> TaskListSortBy {
    TaskListSortBy::Name
}

fn default_sort_order() -> SortOrder {
    SortOrder::Asc
}

/// Search task lists
pub async fn search_task_lists(
    State(state): State<AppState>,
    Query(params): Query<SearchTaskListsParams>,
) -> ApiResult<Json<Vec<TaskList>>> {
    params.validate()?;

    let lists = TaskList::search(
        &state.db,
        TaskListFilter {
            query: params.query,
            user_id: params.user_id,
            limit: params.limit,
            offset: params.offset,
            sort_by: params.sort_by,
            sort_order: params.sort_order,
        },
    )
    .await?;

    Ok(Json(lists))
}

/// Create a task list
pub async fn create_task_list(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskListRequest>,
) -> ApiResult<(StatusCode, Json<TaskList>)> {
    req.validate()?;

    let list = TaskList::create(
        &state.db,
        CreateTaskList {
            user_id: req.user_id,
            name: req.name,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(list)))
}

/// Fetch a task list
pub async fn get_task_list(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<Json<TaskList>> {
    let list = TaskList::find_by_id(&state.db, list_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task list"))?;

    Ok(Json(list))
}

/// Partially update a task list
pub async fn update_task_list(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Json(req): Json<UpdateTaskListRequest>,
) -> ApiResult<Json<TaskList>> {
    req.validate()?;

    let update = UpdateTaskList {
        user_id: req.user_id,
        name: req.name,
    };

    if update.is_empty() {
        return Err(ApiError::NothingToUpdate);
    }

    let list = TaskList::update(&state.db, list_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Task list"))?;

    Ok(Json(list))
}

/// Delete a task list and its memberships
pub async fn delete_task_list(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = TaskList::delete_cascade(&state.db, list_id).await?;

    if !deleted {
        return Err(ApiError::not_found("Task list"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Tasks belonging to a list
pub async fn list_tasks_in_list(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    if TaskList::find_by_id(&state.db, list_id).await?.is_none() {
        return Err(ApiError::not_found("Task list"));
    }

    let tasks = TaskListRelation::tasks_for_list(&state.db, list_id).await?;

    Ok(Json(tasks))
}

/// Add a task to a list
///
/// # Errors
///
/// - `400 Bad Request`: the pair already exists
/// - `404 Not Found`: list or task does not resolve
pub async fn create_task_list_relation(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskListRelationRequest>,
) -> ApiResult<(StatusCode, Json<TaskListRelation>)> {
    if TaskList::find_by_id(&state.db, req.list_id).await?.is_none() {
        return Err(ApiError::not_found("Task list"));
    }
    if Task::find_by_id(&state.db, req.task_id).await?.is_none() {
        return Err(ApiError::not_found("Task"));
    }

    if TaskListRelation::exists(&state.db, req.list_id, req.task_id).await? {
        return Err(ApiError::Conflict {
            message: "Task is already in this list".to_string(),
            error_code: "ASSOCIATION_EXISTS",
        });
    }

    let relation = TaskListRelation::create(&state.db, req.list_id, req.task_id).await?;

    Ok((StatusCode::CREATED, Json(relation)))
}

/// Remove a task from a list
pub async fn delete_task_list_relation(
    State(state): State<AppState>,
    Path((list_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let deleted = TaskListRelation::delete(&state.db, list_id, task_id).await?;

    if !deleted {
        return Err(ApiError::not_found("Task list relation"));
    }

    Ok(StatusCode::NO_CONTENT)
}
