/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a token
/// - `POST /api/auth/password-recovery` - Initiate password recovery
/// - `POST /api/auth/logout` - Logout (bearer; client-side token discard)
///
/// Login deliberately returns one generic error for a wrong password and an
/// unknown email, and password recovery always reports success, so neither
/// endpoint can be used to probe which accounts exist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Json,
};
use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use todomaster_shared::{
    auth::{jwt, password},
    models::user::{normalize_email, CreateUser, PublicUser, User},
    notify::NotificationPayload,
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
}

/// Register / login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed bearer token (7-day validity)
    pub auth_token: String,

    /// Public user record
    pub user: PublicUser,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Password recovery request
#[derive(Debug, Deserialize, Validate)]
pub struct PasswordRecoveryRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Password recovery response
#[derive(Debug, Serialize)]
pub struct PasswordRecoveryResponse {
    pub success: bool,
    pub message: String,
}

/// Register a new user
///
/// Normalizes the email, rejects duplicates, stores the password as an
/// Argon2id hash, and returns a signed token alongside the public user
/// record.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "hunter2", "name": "Jane" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or email already registered
/// - `500 Internal Server Error`: store failure
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let email = normalize_email(&req.email);

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict {
            message: "User with this email already exists".to_string(),
            error_code: "USER_ALREADY_EXISTS",
        });
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
            name: req.name,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.user_id, user.email.clone());
    let auth_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            auth_token,
            user: user.into_public(),
        }),
    ))
}

/// Login
///
/// Looks up the user by normalized email and verifies the password against
/// the stored hash. Unknown email and wrong password produce the same
/// response.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "hunter2" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or invalid credentials
/// - `500 Internal Server Error`: store failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let email = normalize_email(&req.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let claims = jwt::Claims::new(user.user_id, user.email.clone());
    let auth_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse {
        auth_token,
        user: user.into_public(),
    }))
}

/// Initiate password recovery
///
/// Always answers with the same generic message. The recovery notification
/// is dispatched only when the account actually exists.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/password-recovery
/// Content-Type: application/json
///
/// { "email": "user@example.com" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing or malformed email
pub async fn password_recovery(
    State(state): State<AppState>,
    Json(req): Json<PasswordRecoveryRequest>,
) -> ApiResult<Json<PasswordRecoveryResponse>> {
    req.validate()?;

    let email = normalize_email(&req.email);

    if let Some(user) = User::find_by_email(&state.db, &email).await? {
        let payload = NotificationPayload::new(
            "Password recovery",
            format!(
                "Hello {}, follow the link in this message to reset your TodoMaster password.",
                user.name.as_deref().unwrap_or("there")
            ),
        );
        state.notifier.send(&user.email, payload).await?;
    }

    Ok(Json(PasswordRecoveryResponse {
        success: true,
        message: "If an account with that email exists, a recovery message has been sent"
            .to_string(),
    }))
}

/// Logout
///
/// Stateless: the server issues no revocation; clients discard the token.
/// The bearer gate in front of this handler is what produces 401/403 for
/// missing or invalid credentials.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}
