//! # TodoMaster Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the TodoMaster API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their query operations
//! - `auth`: Authentication primitives (JWT, password hashing)
//! - `db`: Connection pool and first-run schema bootstrap
//! - `notify`: Notification dispatch port (trait + implementations)

pub mod auth;
pub mod db;
pub mod models;
pub mod notify;

/// Current version of the TodoMaster shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
