/// Task model and database operations
///
/// Tasks are the core entity of the system. Each task is owned by exactly
/// one user; tags, list memberships, collaborations, comments, and reminders
/// all hang off a task and are removed with it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     task_id UUID PRIMARY KEY,
///     user_id UUID NOT NULL,
///     title TEXT NOT NULL,
///     description TEXT,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     priority TEXT NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::SortOrder;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Converts priority to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Task model
///
/// `priority` is stored as its string form; the [`Priority`] enum is the
/// validation-layer type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub task_id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Completion flag
    pub is_completed: bool,

    /// Priority ("high" | "medium" | "low")
    pub priority: String,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Input for updating a task
///
/// Only supplied fields are written. `description` and `due_date` use a
/// double `Option`: `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub is_completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTask {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.is_completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Sortable columns for task search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSortBy {
    Title,
    CreatedAt,
}

impl TaskSortBy {
    pub fn as_col(&self) -> &'static str {
        match self {
            TaskSortBy::Title => "title",
            TaskSortBy::CreatedAt => "created_at",
        }
    }
}

/// Filter for task search
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Case-insensitive substring matched against title and description
    pub query: Option<String>,

    /// Restrict to a single owner
    pub user_id: Option<Uuid>,

    pub limit: i64,
    pub offset: i64,
    pub sort_by: TaskSortBy,
    pub sort_order: SortOrder,
}

const TASK_COLUMNS: &str =
    "task_id, user_id, title, description, is_completed, priority, due_date, created_at";

impl Task {
    /// Creates a new task
    ///
    /// The id and creation timestamp are generated here; defaults for
    /// `is_completed` and `priority` are applied by the caller's input
    /// schema.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.is_completed)
        .bind(data.priority.as_str())
        .bind(data.due_date)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, task_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = $1"
        ))
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a task
    ///
    /// Builds an UPDATE from the closed set of task columns, touching only
    /// supplied fields. Returns `None` when the id does not resolve.
    pub async fn update(
        pool: &PgPool,
        task_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets = Vec::new();
        let mut bind_count = 1;

        if data.user_id.is_some() {
            bind_count += 1;
            sets.push(format!("user_id = ${}", bind_count));
        }
        if data.title.is_some() {
            bind_count += 1;
            sets.push(format!("title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            sets.push(format!("description = ${}", bind_count));
        }
        if data.is_completed.is_some() {
            bind_count += 1;
            sets.push(format!("is_completed = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            sets.push(format!("priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            sets.push(format!("due_date = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, task_id).await;
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE task_id = $1 RETURNING {TASK_COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(task_id);

        if let Some(user_id) = data.user_id {
            q = q.bind(user_id);
        }
        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(is_completed) = data.is_completed {
            q = q.bind(is_completed);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority.as_str());
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task and every row referencing it
    ///
    /// Tag associations, list memberships, collaborations, comments, and
    /// reminders are removed before the task row itself, all inside one
    /// transaction so a mid-cascade failure rolls back cleanly.
    ///
    /// Returns true if the task existed.
    pub async fn delete_cascade(pool: &PgPool, task_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for table in [
            "task_tags",
            "task_list_relations",
            "task_collaborations",
            "task_comments",
            "reminders",
        ] {
            sqlx::query(&format!("DELETE FROM {table} WHERE task_id = $1"))
                .bind(task_id)
                .execute(&mut *tx)
                .await?;
        }

        let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Searches tasks with filters, sorting, and pagination
    ///
    /// The substring filter matches case-insensitively against title and
    /// description; sort column and direction come from closed enums.
    pub async fn search(pool: &PgPool, filter: TaskFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1=1");
        let mut bind_count = 0;

        if filter.query.is_some() {
            bind_count += 1;
            query.push_str(&format!(
                " AND (title ILIKE ${b} OR description ILIKE ${b})",
                b = bind_count
            ));
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

        let mut q = sqlx::query_as::<_, Task>(&query);
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
