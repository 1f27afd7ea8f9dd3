/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, recovery, logout)
/// - `users`: Public user profiles and search
/// - `tasks`: Task CRUD and search
/// - `task_lists`: Task list CRUD, search, and memberships
/// - `tags`: Tag CRUD and search
/// - `task_tags`: Task-tag associations
/// - `task_collaborations`: External collaborator invitations
/// - `task_comments`: Append-only task comments
/// - `reminders`: Scheduled task reminders

use serde::{Deserialize, Deserializer};

/// Deserializer for patch fields that distinguish "absent" from "null"
///
/// Serde collapses a JSON `null` and a missing field to the same outer
/// `None` for `Option<Option<T>>`. Wrapping the present case restores the
/// distinction: missing → `None`, `null` → `Some(None)`, value →
/// `Some(Some(v))`. Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

pub mod auth;
pub mod health;
pub mod reminders;
pub mod tags;
pub mod task_collaborations;
pub mod task_comments;
pub mod task_lists;
pub mod task_tags;
pub mod tasks;
pub mod users;
