/// Task list model and database operations
///
/// Lists group tasks through the `task_list_relations` table; deleting a
/// list removes its memberships but never the tasks themselves.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::SortOrder;

/// Task list model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskList {
    /// Unique list ID
    pub list_id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// List name
    pub name: String,
}

/// Input for creating a task list
#[derive(Debug, Clone)]
pub struct CreateTaskList {
    pub user_id: Uuid,
    pub name: String,
}

/// Input for updating a task list
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskList {
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
}

impl UpdateTaskList {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.name.is_none()
    }
}

/// Sortable columns for list search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskListSortBy {
    Name,
}

impl TaskListSortBy {
    pub fn as_col(&self) -> &'static str {
        match self {
            TaskListSortBy::Name => "name",
        }
    }
}

/// Filter for list search
#[derive(Debug, Clone)]
pub struct TaskListFilter {
    pub query: Option<String>,
    pub user_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
    pub sort_by: TaskListSortBy,
    pub sort_order: SortOrder,
}

impl TaskList {
    /// Creates a new task list with a generated id
    pub async fn create(pool: &PgPool, data: CreateTaskList) -> Result<Self, sqlx::Error> {
        let list = sqlx::query_as::<_, TaskList>(
            r#"
            INSERT INTO task_lists (list_id, user_id, name)
            VALUES ($1, $2, $3)
            RETURNING list_id, user_id, name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(list)
    }

    /// Finds a list by ID
    pub async fn find_by_id(pool: &PgPool, list_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let list = sqlx::query_as::<_, TaskList>(
            "SELECT list_id, user_id, name FROM task_lists WHERE list_id = $1",
        )
        .bind(list_id)
        .fetch_optional(pool)
        .await?;

        Ok(list)
    }

    /// Updates a list, touching only supplied fields
    pub async fn update(
        pool: &PgPool,
        list_id: Uuid,
        data: UpdateTaskList,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets = Vec::new();
        let mut bind_count = 1;

        if data.user_id.is_some() {
            bind_count += 1;
            sets.push(format!("user_id = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            sets.push(format!("name = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, list_id).await;
        }

        let query = format!(
            "UPDATE task_lists SET {} WHERE list_id = $1 RETURNING list_id, user_id, name",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, TaskList>(&query).bind(list_id);

        if let Some(user_id) = data.user_id {
            q = q.bind(user_id);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }

        let list = q.fetch_optional(pool).await?;

        Ok(list)
    }

    /// Deletes a list and its memberships
    ///
    /// Relations are removed before the list row, in one transaction. Tasks
    /// are left untouched. Returns true if the list existed.
    pub async fn delete_cascade(pool: &PgPool, list_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM task_list_relations WHERE list_id = $1")
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM task_lists WHERE list_id = $1")
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Searches lists with filters, sorting, and pagination
    pub async fn search(pool: &PgPool, filter: TaskListFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query =
            String::from("SELECT list_id, user_id, name FROM task_lists WHERE 1=1");
        let mut bind_count = 0;

        if filter.query.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND name ILIKE ${}", bind_count));
        }
        if filter.user_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND user_id = ${}", bind_count));
        }

        query.push_str(&format!(
            " ORDER BY {} {} LIMIT ${} OFFSET ${}",
            filter.sort_by.as_col(),
            filter.sort_order.as_sql(),
            bind_count + 1,
            bind_count + 2
        ));

        let mut q = sqlx::query_as::<_, TaskList>(&query);
        if let Some(term) = &filter.query {
            q = q.bind(format!("%{}%", term));
        }
        if let Some(user_id) = filter.user_id {
            q = q.bind(user_id);
        }
        q = q.bind(filter.limit).bind(filter.offset);

        q.fetch_all(pool).await
    }
}
