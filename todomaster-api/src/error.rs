/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`, which converts automatically
/// to the wire error shape:
///
/// ```json
/// {
///   "success": false,
///   "message": "Task not found",
///   "error_code": "NOT_FOUND",
///   "details": null,
///   "timestamp": "2024-01-01T00:00:00Z"
/// }
/// ```
///
/// No failure escapes a handler unshaped; store errors are logged and
/// surface as a generic 500 without leaking internals.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use todomaster_shared::{auth::jwt::JwtError, auth::password::PasswordError, notify::NotifyError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Input failed schema validation (400)
    Validation(Vec<ValidationErrorDetail>),

    /// Login failed; deliberately generic (400)
    InvalidCredentials,

    /// Authorization header missing (401)
    TokenRequired,

    /// Token signature valid but the user no longer exists (401)
    IdentityNotFound,

    /// Token invalid or expired (403)
    TokenInvalid,

    /// Resource id did not resolve (404)
    NotFound(String),

    /// Duplicate email or association (400)
    Conflict {
        message: String,
        error_code: &'static str,
    },

    /// Update payload carried no recognized fields (400)
    NothingToUpdate,

    /// Store failure or other unexpected error (500)
    Internal(String),
}

impl ApiError {
    /// Not-found error for a named resource
    pub fn not_found(resource: &str) -> Self {
        ApiError::NotFound(format!("{} not found", resource))
    }
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Wire error shape for all non-2xx responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always false
    pub success: bool,

    /// Human-readable error message
    pub message: String,

    /// Machine-readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Optional structured details (e.g., per-field validation failures)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// When the error was produced
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InvalidCredentials => write!(f, "Invalid email or password"),
            ApiError::TokenRequired => write!(f, "Access token required"),
            ApiError::IdentityNotFound => write!(f, "Invalid token - user not found"),
            ApiError::TokenInvalid => write!(f, "Invalid or expired token"),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
            ApiError::NothingToUpdate => write!(f, "Nothing to update"),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Request validation failed".to_string(),
                serde_json::to_value(&errors).ok(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
                None,
            ),
            ApiError::TokenRequired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_REQUIRED",
                "Access token required".to_string(),
                None,
            ),
            ApiError::IdentityNotFound => (
                StatusCode::UNAUTHORIZED,
                "AUTH_USER_NOT_FOUND",
                "Invalid token - user not found".to_string(),
                None,
            ),
            ApiError::TokenInvalid => (
                StatusCode::FORBIDDEN,
                "AUTH_TOKEN_INVALID",
                "Invalid or expired token".to_string(),
                None,
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Conflict {
                message,
                error_code,
            } => (StatusCode::BAD_REQUEST, error_code, message, None),
            ApiError::NothingToUpdate => (
                StatusCode::BAD_REQUEST,
                "NOTHING_TO_UPDATE",
                "No fields provided to update".to_string(),
                None,
            ),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            success: false,
            message,
            error_code: Some(error_code.to_string()),
            details,
            timestamp: Utc::now(),
        });

        (status, body).into_response()
    }
}

/// Convert validator failures into the structured 400 response
impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::Validation(errors)
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Constraint violations mean a concurrent duplicate slipped
                // past the handler's own existence check
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict {
                            message: "User with this email already exists".to_string(),
                            error_code: "USER_ALREADY_EXISTS",
                        };
                    }
                    return ApiError::Conflict {
                        message: "Resource already exists".to_string(),
                        error_code: "ALREADY_EXISTS",
                    };
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert token errors to API errors
impl From<JwtError> for ApiError {
    fn from(_err: JwtError) -> Self {
        ApiError::TokenInvalid
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert notification errors to API errors
impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        ApiError::Internal(format!("Notification dispatch failed: {}", err))
    }
}
