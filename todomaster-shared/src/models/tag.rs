/// Tag model and database operations
///
/// Tags are user-owned labels attached to tasks through the `task_tags`
/// association table; deleting a tag removes its associations.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::SortOrder;

/// Tag model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag ID
    pub tag_id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Tag name
    pub name: String,
}

/// Input for creating a tag
#[derive(Debug, Clone)]
pub struct CreateTag {
    pub user_id: Uuid,
    pub name: String,
}

/// Input for updating a tag
#[derive(Debug, Clone, Default)]
pub struct UpdateTag {
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
}

impl UpdateTag {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.name.is_none()
    }
}

/// Sortable columns for tag search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSortBy {
    Name,
}

impl TagSortBy {
    pub fn as_col(&self) -> &'static str {
        match self {
            TagSortBy::Name => "name",
        }
    }
}

/// Filter for tag search
#[derive(Debug, Clone)]
pub struct TagFilter {
    pub query: Option<String>,
    pub user_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
    pub sort_by: TagSortBy,
    pub sort_order: SortOrder,
}

impl Tag {
    /// Creates a new tag with a generated id
    pub async fn create(pool: &PgPool, data: CreateTag) -> Result<Self, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (tag_id, user_id, name)
            VALUES ($1, $2, $3)
            RETURNING tag_id, user_id, name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(tag)
    }

    /// Finds a tag by ID
    pub async fn find_by_id(pool: &PgPool, tag_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tag =
            sqlx::query_as::<_, Tag>("SELECT tag_id, user_id, name FROM tags WHERE tag_id = $1")
                .bind(tag_id)
                .fetch_optional(pool)
                .await?;

        Ok(tag)
    }

    /// Updates a tag, touching only supplied fields
    pub async fn update(
        pool: &PgPool,
        tag_id: Uuid,
        data: UpdateTag,
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
            return Self::find_by_id(pool, tag_id).await;
        }

        let query = format!(
            "UPDATE tags SET {} WHERE tag_id = $1 RETURNING tag_id, user_id, name",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Tag>(&query).bind(tag_id);

        if let Some(user_id) = data.user_id {
            q = q.bind(user_id);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }

        let tag = q.fetch_optional(pool).await?;

        Ok(tag)
    }

    /// Deletes a tag and its task associations
    ///
    /// Associations go first, then the tag row, in one transaction.
    /// Returns true if the tag existed.
    pub async fn delete_cascade(pool: &PgPool, tag_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM task_tags WHERE tag_id = $1")
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tags WHERE tag_id = $1")
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Searches tags with filters, sorting, and pagination
    pub async fn search(pool: &PgPool, filter: TagFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from("SELECT tag_id, user_id, name FROM tags WHERE 1=1");
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

        let mut q = sqlx::query_as::<_, Tag>(&query);
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
