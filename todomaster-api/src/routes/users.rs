/// User endpoints
///
/// # Endpoints
///
/// - `GET /api/users` - Search users
/// - `GET /api/users/:user_id` - Public profile

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
};
use axum::extract::State;
use serde::Deserialize;
use todomaster_shared::models::{
    user::{PublicUser, User, UserFilter, UserSortBy},
    SortOrder,
};
use uuid::Uuid;
use validator::Validate;

/// User search parameters
#[derive(Debug, Deserialize, Validate)]
pub struct SearchUsersParams {
    /// Substring matched against email and name (case-insensitive)
    pub query: Option<String>,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be positive"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "offset must be non-negative"))]
    pub offset: i64,

    #[serde(default = "default_sort_by")]
    pub sort_by: UserSortBy,

    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
}

fn default_limit() -> i64 {
    10
}

fn default_sort_by() -> UserSortBy {
    UserSortBy::CreatedAt
}

fn default_sort_order() -> SortOrder {
    SortOrder::Desc
}

/// Search users
///
/// # Endpoint
///
/// ```text
/// GET /api/users?query=jane&limit=10&offset=0&sort_by=created_at&sort_order=desc
/// ```
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchUsersParams>,
) -> ApiResult<Json<Vec<PublicUser>>> {
    params.validate()?;

    let users = User::search(
        &state.db,
        UserFilter {
            query: params.query,
            limit: params.limit,
            offset: params.offset,
            sort_by: params.sort_by,
            sort_order: params.sort_order,
        },
    )
    .await?;

    Ok(Json(users.into_iter().map(User::into_public).collect()))
}

/// Public user profile
///
/// # Endpoint
///
/// ```text
/// GET /api/users/:user_id
/// ```
///
/// # Errors
///
/// - `404 Not Found`: id does not resolve
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user.into_public()))
}
