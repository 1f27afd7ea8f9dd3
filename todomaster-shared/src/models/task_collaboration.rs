/// Task collaboration
///
/// Invites an external participant to a task by email. Keyed on
/// `(task_id, collaborator_email)`; emails are stored normalized.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Collaboration row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskCollaboration {
    pub task_id: Uuid,
    pub collaborator_email: String,
}

impl TaskCollaboration {
    /// Checks whether the pair already exists
    pub async fn exists(pool: &PgPool, task_id: Uuid, email: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM task_collaborations \
             WHERE task_id = $1 AND collaborator_email = $2",
        )
        .bind(task_id)
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// Inserts the collaboration
    pub async fn create(pool: &PgPool, task_id: Uuid, email: &str) -> Result<Self, sqlx::Error> {
        let collaboration = sqlx::query_as::<_, TaskCollaboration>(
            r#"
            INSERT INTO task_collaborations (task_id, collaborator_email)
            VALUES ($1, $2)
            RETURNING task_id, collaborator_email
            "#,
        )
        .bind(task_id)
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(collaboration)
    }

    /// Deletes the collaboration; returns true if the pair existed
    pub async fn delete(pool: &PgPool, task_id: Uuid, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM task_collaborations \
             WHERE task_id = $1 AND collaborator_email = $2",
        )
        .bind(task_id)
        .bind(email)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the collaborators on a task
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let collaborations = sqlx::query_as::<_, TaskCollaboration>(
            r#"
            SELECT task_id, collaborator_email
            FROM task_collaborations
            WHERE task_id = $1
            ORDER BY collaborator_email ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(collaborations)
    }
}
