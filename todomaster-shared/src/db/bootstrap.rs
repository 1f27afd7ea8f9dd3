/// First-run database bootstrap
///
/// Loads the embedded `init.sql` script (table definitions plus seed rows)
/// when the server starts against an empty database. The bootstrap is
/// idempotent: if the `users` table already holds rows, the whole step is
/// skipped. This is deliberately not a migration system; schema changes
/// beyond the initial create are out of scope.
///
/// The script is split into individual statements on `CREATE TABLE` and
/// `INSERT INTO` boundaries and each statement is executed on its own, since
/// prepared statements accept a single command at a time.

use sqlx::PgPool;
use tracing::{debug, info};

/// Embedded schema + seed script
const INIT_SQL: &str = include_str!("init.sql");

/// Runs the first-run bootstrap against the given pool
///
/// # Errors
///
/// Returns an error if any statement in the script fails to execute. The
/// table definitions use `IF NOT EXISTS`, so a partially bootstrapped
/// database can be retried safely.
pub async fn initialize(pool: &PgPool) -> Result<(), sqlx::Error> {
    if is_initialized(pool).await {
        info!("Database already initialized with data, skipping bootstrap");
        return Ok(());
    }

    info!("Database not initialized, running schema bootstrap");

    for statement in split_statements(INIT_SQL) {
        debug!(statement = %statement.lines().next().unwrap_or(""), "Executing bootstrap statement");
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database bootstrap completed successfully");
    Ok(())
}

/// Checks whether the database already carries data
///
/// A query failure (e.g., the `users` table does not exist yet) counts as
/// "not initialized".
async fn is_initialized(pool: &PgPool) -> bool {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
    {
        Ok(count) => count > 0,
        Err(_) => false,
    }
}

/// Splits the bootstrap script into executable statements
///
/// Statements begin at every `CREATE TABLE` or `INSERT INTO` keyword;
/// anything before the first keyword is ignored.
pub fn split_statements(script: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    for pattern in ["CREATE TABLE", "INSERT INTO"] {
        let mut from = 0;
        while let Some(found) = script[from..].find(pattern) {
            starts.push(from + found);
            from += found + pattern.len();
        }
    }
    starts.sort_unstable();

    let mut statements = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(script.len());
        let statement = script[start..end].trim();
        if !statement.is_empty() {
            statements.push(statement);
        }
    }
    statements
}
