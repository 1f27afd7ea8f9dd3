/// Database layer for TodoMaster
///
/// This module provides connection pooling and the first-run schema
/// bootstrap.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `bootstrap`: one-time schema creation and seed-data load
///
/// Models live in the `models` module at crate root level.

pub mod bootstrap;
pub mod pool;
