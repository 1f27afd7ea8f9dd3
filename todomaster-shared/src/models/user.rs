/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing user
/// accounts.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     user_id UUID PRIMARY KEY,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     name TEXT,
///     created_at TIMESTAMPTZ NOT NULL,
///     email_verified BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```
///
/// Emails are stored normalized (lowercased, trimmed); callers must run
/// [`normalize_email`] before lookups and inserts so that
/// `User@Example.com ` and `user@example.com` resolve to the same account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::SortOrder;

/// User model representing a user account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub user_id: Uuid,

    /// Email address, normalized to lowercase
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// Whether the email address has been verified
    pub email_verified: bool,
}

/// Public projection of a user account
///
/// Everything except the password hash; this is the shape returned by the
/// API and attached to authenticated requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub email_verified: bool,
}

impl User {
    /// Strips the credential from the record
    pub fn into_public(self) -> PublicUser {
        PublicUser {
            user_id: self.user_id,
            email: self.email,
            name: self.name,
            created_at: self.created_at,
            email_verified: self.email_verified,
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Normalized email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,
}

/// Input for updating an existing user
///
/// All fields are optional. Only supplied fields are written; `name` uses a
/// double `Option` so that `Some(None)` clears the value while `None` leaves
/// it untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<Option<String>>,
    pub email_verified: Option<bool>,
}

impl UpdateUser {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password_hash.is_none()
            && self.name.is_none()
            && self.email_verified.is_none()
    }
}

/// Sortable columns for user search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortBy {
    Email,
    CreatedAt,
}

impl UserSortBy {
    pub fn as_col(&self) -> &'static str {
        match self {
            UserSortBy::Email => "email",
            UserSortBy::CreatedAt => "created_at",
        }
    }
}

/// Filter for user search
#[derive(Debug, Clone)]
pub struct UserFilter {
    /// Case-insensitive substring matched against email and name
    pub query: Option<String>,
    pub limit: i64,
    pub offset: i64,
    pub sort_by: UserSortBy,
    pub sort_order: SortOrder,
}

/// Normalizes an email address for storage and lookup
///
/// Lowercases and trims surrounding whitespace.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl User {
    /// Creates a new user
    ///
    /// The caller supplies a normalized email and a password hash; the id
    /// and creation timestamp are generated here.
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or
    /// the statement fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, password_hash, name, created_at, email_verified)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id, email, password_hash, name, created_at, email_verified
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(Utc::now())
        .bind(false)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// Returns `None` when the id does not resolve.
    pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, name, created_at, email_verified
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by normalized email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, name, created_at, email_verified
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates an existing user
    ///
    /// Builds an UPDATE touching only the supplied fields; the set of
    /// updatable columns is closed and known here. Returns the updated user,
    /// or `None` if the id does not resolve.
    ///
    /// Callers are expected to reject an empty patch up front via
    /// [`UpdateUser::is_empty`].
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets = Vec::new();
        let mut bind_count = 1;

        if data.email.is_some() {
            bind_count += 1;
            sets.push(format!("email = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            sets.push(format!("password_hash = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            sets.push(format!("name = ${}", bind_count));
        }
        if data.email_verified.is_some() {
            bind_count += 1;
            sets.push(format!("email_verified = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, user_id).await;
        }

        let query = format!(
            "UPDATE users SET {} WHERE user_id = $1 \
             RETURNING user_id, email, password_hash, name, created_at, email_verified",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(user_id);

        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(name_opt) = data.name {
            q = q.bind(name_opt);
        }
        if let Some(verified) = data.email_verified {
            q = q.bind(verified);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Searches users with substring filter, sorting, and pagination
    pub async fn search(pool: &PgPool, filter: UserFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT user_id, email, password_hash, name, created_at, email_verified \
             FROM users WHERE 1=1",
        );
        let mut bind_count = 0;

        if filter.query.is_some() {
            bind_count += 1;
            query.push_str(&format!(
                " AND (email ILIKE ${b} OR name ILIKE ${b})",
                b = bind_count
            ));
        }

        query.push_str(&format!(
            " ORDER BY {} {} LIMIT ${} OFFSET ${}",
            filter.sort_by.as_col(),
            filter.sort_order.as_sql(),
            bind_count + 1,
            bind_count + 2
        ));

        let mut q = sqlx::query_as::<_, User>(&query);
        if let Some(term) = &filter.query {
            q = q.bind(format!("%{}%", term));
        }
        q = q.bind(filter.limit).bind(filter.offset);

        q.fetch_all(pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
        assert_eq!(normalize_email("plain@example.com"), "plain@example.com");
    }

    #[test]
    fn test_update_user_default_is_empty() {
        let update = UpdateUser::default();
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_user_with_field_is_not_empty() {
        let update = UpdateUser {
            name: Some(Some("Jane Doe".to_string())),
            ..Default::default()
        };
        assert!(!update.is_empty());

        let cleared = UpdateUser {
            name: Some(None),
            ..Default::default()
        };
        assert!(!cleared.is_empty());
    }

    #[test]
    fn test_into_public_drops_credential() {
        let user = User {
            user_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            name: Some("Test User".to_string()),
            created_at: Utc::now(),
            email_verified: false,
        };

        let public = user.clone().into_public();
        assert_eq!(public.user_id, user.user_id);
        assert_eq!(public.email, user.email);

        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_user_sort_by_columns() {
        assert_eq!(UserSortBy::Email.as_col(), "email");
        assert_eq!(UserSortBy::CreatedAt.as_col(), "created_at");
    }

    // Integration tests for database operations are in todomaster-api/tests/
}
