/// Task-tag association
///
/// Many-to-many link between tasks and tags. The composite primary key on
/// `(task_id, tag_id)` guarantees a pair exists at most once even when two
/// identical creates race; handlers pre-check with [`TaskTag::exists`] to
/// produce the specific conflict response.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::tag::Tag;

/// Task-tag association row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskTag {
    pub task_id: Uuid,
    pub tag_id: Uuid,
}

impl TaskTag {
    /// Checks whether the pair already exists
    pub async fn exists(pool: &PgPool, task_id: Uuid, tag_id: Uuid) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM task_tags WHERE task_id = $1 AND tag_id = $2",
        )
        .bind(task_id)
        .bind(tag_id)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// Inserts the association
    ///
    /// A lost duplicate-check race surfaces as a unique-violation error from
    /// the store.
    pub async fn create(pool: &PgPool, task_id: Uuid, tag_id: Uuid) -> Result<Self, sqlx::Error> {
        let association = sqlx::query_as::<_, TaskTag>(
            r#"
            INSERT INTO task_tags (task_id, tag_id)
            VALUES ($1, $2)
            RETURNING task_id, tag_id
            "#,
        )
        .bind(task_id)
        .bind(tag_id)
        .fetch_one(pool)
        .await?;

        Ok(association)
    }

    /// Deletes the association; returns true if the pair existed
    pub async fn delete(pool: &PgPool, task_id: Uuid, tag_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_tags WHERE task_id = $1 AND tag_id = $2")
            .bind(task_id)
            .bind(tag_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the tags attached to a task, name-ordered
    pub async fn tags_for_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Tag>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.tag_id, t.user_id, t.name
            FROM tags t
            JOIN task_tags tt ON tt.tag_id = t.tag_id
            WHERE tt.task_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }
}
