/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todomaster_api::{app::{build_router, AppState}, config::Config};
/// use todomaster_shared::notify::LogNotifier;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, Arc::new(LogNotifier::new()));
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use todomaster_shared::{auth::jwt, models::user::User, notify::Notifier};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Every
/// dependency is injected here explicitly; handlers never reach for global
/// state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Notification dispatch port
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            notifier,
        }
    }

    /// Gets the token-signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /api
/// ├── /health                                   GET
/// ├── /auth
/// │   ├── /register                             POST
/// │   ├── /login                                POST
/// │   ├── /password-recovery                    POST
/// │   └── /logout                               POST  (bearer)
/// ├── /users                                    GET
/// │   └── /:user_id                             GET
/// ├── /tasks                                    GET POST
/// │   └── /:task_id                             GET PUT DELETE
/// │       ├── /tags                             GET
/// │       ├── /collaborations                   GET
/// │       ├── /comments                         GET
/// │       └── /reminders                        GET
/// ├── /task-lists                               GET POST
/// │   └── /:list_id                             GET PUT DELETE
/// │       └── /tasks                            GET
/// ├── /task-list-relations                      POST
/// │   └── /:list_id/:task_id                    DELETE
/// ├── /tags                                     GET POST
/// │   └── /:tag_id                              GET PUT DELETE
/// ├── /task-tags                                POST
/// │   └── /:task_id/:tag_id                     DELETE
/// ├── /task-collaborations                      POST
/// │   └── /:task_id/:collaborator_email         DELETE
/// ├── /task-comments                            POST
/// └── /reminders                                POST
///     └── /:reminder_id                         DELETE
/// ```
///
/// # Middleware Stack
///
/// 1. Request tracing (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer, origin from config)
/// 3. Body size cap (from config)
/// 4. Bearer authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Logout is the only bearer-gated endpoint; the rest of the auth group
    // is public by definition
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/password-recovery", post(routes::auth::password_recovery))
        .route(
            "/logout",
            post(routes::auth::logout).layer(axum::middleware::from_fn_with_state(
                state.clone(),
                bearer_auth_layer,
            )),
        );

    let user_routes = Router::new()
        .route("/", get(routes::users::search_users))
        .route("/:user_id", get(routes::users::get_user));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::search_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:task_id/tags", get(routes::task_tags::list_task_tags))
        .route(
            "/:task_id/collaborations",
            get(routes::task_collaborations::list_task_collaborations),
        )
        .route(
            "/:task_id/comments",
            get(routes::task_comments::list_task_comments),
        )
        .route(
            "/:task_id/reminders",
            get(routes::reminders::list_task_reminders),
        );

    let task_list_routes = Router::new()
        .route(
            "/",
            get(routes::task_lists::search_task_lists).post(routes::task_lists::create_task_list),
        )
        .route(
            "/:list_id",
            get(routes::task_lists::get_task_list)
                .put(routes::task_lists::update_task_list)
                .delete(routes::task_lists::delete_task_list),
        )
        .route("/:list_id/tasks", get(routes::task_lists::list_tasks_in_list));

    let tag_routes = Router::new()
        .route(
            "/",
            get(routes::tags::search_tags).post(routes::tags::create_tag),
        )
        .route(
            "/:tag_id",
            get(routes::tags::get_tag)
                .put(routes::tags::update_tag)
                .delete(routes::tags::delete_tag),
        );

    let api_routes = Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .nest("/task-lists", task_list_routes)
        .route(
            "/task-list-relations",
            post(routes::task_lists::create_task_list_relation),
        )
        .route(
            "/task-list-relations/:list_id/:task_id",
            delete(routes::task_lists::delete_task_list_relation),
        )
        .nest("/tags", tag_routes)
        .route("/task-tags", post(routes::task_tags::create_task_tag))
        .route(
            "/task-tags/:task_id/:tag_id",
            delete(routes::task_tags::delete_task_tag),
        )
        .route(
            "/task-collaborations",
            post(routes::task_collaborations::create_task_collaboration),
        )
        .route(
            "/task-collaborations/:task_id/:collaborator_email",
            delete(routes::task_collaborations::delete_task_collaboration),
        )
        .route(
            "/task-comments",
            post(routes::task_comments::create_task_comment),
        )
        .route("/reminders", post(routes::reminders::create_reminder))
        .route(
            "/reminders/:reminder_id",
            delete(routes::reminders::delete_reminder),
        );

    // Configure CORS from the allowed browser origin
    let cors = if state.config.api.cors_origin == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origin
            .parse()
            .ok()
            .into_iter()
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(state.config.api.body_limit_bytes))
        .with_state(state)
}

/// Bearer authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// resolves it to a live user row, and injects the public user record into
/// request extensions. A valid signature whose user has since been deleted
/// is rejected.
async fn bearer_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(crate::error::ApiError::TokenRequired)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(crate::error::ApiError::TokenRequired)?;

    let claims = jwt::validate_token(token, state.jwt_secret())
        .map_err(|_| crate::error::ApiError::TokenInvalid)?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(crate::error::ApiError::IdentityNotFound)?;

    req.extensions_mut().insert(user.into_public());

    Ok(next.run(req).await)
}
