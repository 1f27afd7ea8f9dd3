/// Database models for TodoMaster
///
/// This module contains all database models and their query operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `task`: Tasks owned by a user
/// - `task_list`: Named task lists
/// - `task_list_relation`: Task membership in lists (many-to-many)
/// - `tag`: User-defined tags
/// - `task_tag`: Task-tag associations (many-to-many)
/// - `task_collaboration`: External collaborators invited by email
/// - `task_comment`: Append-only task comments
/// - `reminder`: Scheduled task reminders

pub mod reminder;
pub mod tag;
pub mod task;
pub mod task_collaboration;
pub mod task_comment;
pub mod task_list;
pub mod task_list_relation;
pub mod task_tag;
pub mod user;

use serde::{Deserialize, Serialize};

/// Sort direction accepted by every search operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
