/// Task-list membership
///
/// Many-to-many link between lists and tasks, keyed on `(list_id, task_id)`.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::task::Task;

/// List membership row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskListRelation {
    pub list_id: Uuid,
    pub task_id: Uuid,
}

impl TaskListRelation {
    /// Checks whether the pair already exists
    pub async fn exists(pool: &PgPool, list_id: Uuid, task_id: Uuid) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM task_list_relations WHERE list_id = $1 AND task_id = $2",
        )
        .bind(list_id)
        .bind(task_id)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// Inserts the membership
    pub async fn create(
        pool: &PgPool,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let relation = sqlx::query_as::<_, TaskListRelation>(
            r#"
            INSERT INTO task_list_relations (list_id, task_id)
            VALUES ($1, $2)
            RETURNING list_id, task_id
            "#,
        )
        .bind(list_id)
        .bind(task_id)
        .fetch_one(pool)
        .await?;

        Ok(relation)
    }

    /// Deletes the membership; returns true if the pair existed
    pub async fn delete(pool: &PgPool, list_id: Uuid, task_id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM task_list_relations WHERE list_id = $1 AND task_id = $2")
                .bind(list_id)
                .bind(task_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the tasks belonging to a list, newest first
    pub async fn tasks_for_list(pool: &PgPool, list_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.task_id, t.user_id, t.title, t.description, t.is_completed,
                   t.priority, t.due_date, t.created_at
            FROM tasks t
            JOIN task_list_relations r ON r.task_id = t.task_id
            WHERE r.list_id = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(list_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}
