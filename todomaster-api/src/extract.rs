/// Request extractors that keep rejections in the wire error shape
///
/// Axum's stock extractors reply to malformed input with plain-text bodies.
/// Every failure leaving this API must carry the structured error envelope,
/// so the handlers use these thin wrappers instead: they delegate to the
/// stock extractors and convert rejections into [`ApiError`].
///
/// - [`Json`]: malformed/mistyped body → 400 validation error
/// - [`Query`]: malformed query string → 400 validation error
/// - [`Path`]: unparseable path parameter → 404 (an id that cannot parse
///   cannot name a resource)

use crate::error::{ApiError, ValidationErrorDetail};
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};

/// JSON body extractor and response wrapper
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(ApiError::Validation(vec![ValidationErrorDetail {
                field: "body".to_string(),
                message: rejection.body_text(),
            }])),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query string extractor
pub struct Query<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(ApiError::Validation(vec![ValidationErrorDetail {
                field: "query".to_string(),
                message: rejection.body_text(),
            }])),
        }
    }
}

/// Path parameter extractor
pub struct Path<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(_) => Err(ApiError::NotFound("Resource not found".to_string())),
        }
    }
}
