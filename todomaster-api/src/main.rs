//! # TodoMaster API Server
//!
//! REST API for the TodoMaster task-management application: users, tasks,
//! task lists, tags, collaborations, comments, and reminders over a
//! PostgreSQL store.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p todomaster-api
//! ```

use std::sync::Arc;
use todomaster_api::{
    app::{build_router, AppState},
    config::Config,
};
use todomaster_shared::{
    db::{bootstrap, pool},
    notify::LogNotifier,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todomaster_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TodoMaster API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    bootstrap::initialize(&db).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db, config, Arc::new(LogNotifier::new()));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("TodoMaster server running on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
