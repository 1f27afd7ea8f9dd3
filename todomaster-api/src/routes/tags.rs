/// Tag endpoints
///
/// # Endpoints
///
/// - `GET /api/tags` - Search tags
/// - `POST /api/tags` - Create tag
/// - `GET /api/tags/:tag_id` - Fetch tag
/// - `PUT /api/tags/:tag_id` - Partial update
/// - `DELETE /api/tags/:tag_id` - Delete tag and its associations

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use todomaster_shared::models::{
    tag::{CreateTag, Tag, TagFilter, TagSortBy, UpdateTag},
    SortOrder,
};
use uuid::Uuid;
use validator::Validate;

/// Tag creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}

/// Tag update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTagRequest {
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
}

/// Tag search parameters
#[derive(Debug, Deserialize, Validate)]
pub struct SearchTagsParams {
    pub query: Option<String>,
    pub user_id: Option<Uuid>,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be positive"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "offset must be non-negative"))]
    pub offset: i64,

    #[serde(default = "default_sort_by")]
    pub sort_by: TagSortBy,

    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
}

fn default_limit() -> i64 {
    10
}

fn default_sort_by() -> TagSortBy {
    TagSortBy::Name
}

fn default_sort_order() -> SortOrder {
    SortOrder::Asc
}

/// Search tags
pub async fn search_tags(
    State(state): State<AppState>,
    Query(params): Query<SearchTagsParams>,
) -> ApiResult<Json<Vec<Tag>>> {
    params.validate()?;

    let tags = Tag::search(
        &state.db,
        TagFilter {
            query: params.query,
            user_id: params.user_id,
            limit: params.limit,
            offset: params.offset,
            sort_by: params.sort_by,
            sort_order: params.sort_order,
        },
    )
    .await?;

    Ok(Json(tags))
}

/// Create a tag
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    req.validate()?;

    let tag = Tag::create(
        &state.db,
        CreateTag {
            user_id: req.user_id,
            name: req.name,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// Fetch a tag
pub async fn get_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<Uuid>,
) -> ApiResult<Json<Tag>> {
    let tag = Tag::find_by_id(&state.db, tag_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tag"))?;

    Ok(Json(tag))
}

/// Partially update a tag
pub async fn update_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<Uuid>,
    Json(req): Json<UpdateTagRequest>,
) -> ApiResult<Json<Tag>> {
    req.validate()?;

    let update = UpdateTag {
        user_id: req.user_id,
        name: req.name,
    };

    if update.is_empty() {
        return Err(ApiError::NothingToUpdate);
    }

    let tag = Tag::update(&state.db, tag_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Tag"))?;

    Ok(Json(tag))
}

/// Delete a tag and its task associations
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Tag::delete_cascade(&state.db, tag_id).await?;

    if !deleted {
        return Err(ApiError::not_found("Tag"));
    }

    Ok(StatusCode::NO_CONTENT)
}
