/// Task comments
///
/// Append-only: comments are created and listed, never edited or removed on
/// their own. They disappear only when their task is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskComment {
    /// Unique comment ID
    pub comment_id: Uuid,

    /// Task the comment belongs to
    pub task_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Comment body (non-empty)
    pub content: String,

    /// When the comment was written
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateTaskComment {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

impl TaskComment {
    /// Appends a comment with a generated id and timestamp
    pub async fn create(pool: &PgPool, data: CreateTaskComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, TaskComment>(
            r#"
            INSERT INTO task_comments (comment_id, task_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING comment_id, task_id, user_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.content)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Lists the comments on a task, newest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, TaskComment>(
            r#"
            SELECT comment_id, task_id, user_id, content, created_at
            FROM task_comments
            WHERE task_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }
}
