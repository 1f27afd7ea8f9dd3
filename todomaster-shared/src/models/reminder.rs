/// Reminder model and database operations
///
/// A reminder schedules a notification for a task at a given instant via a
/// delivery method. Actual delivery goes through the `notify` port; this
/// module only persists the schedule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Reminder delivery method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    #[default]
    Email,
    Push,
}

impl ReminderMethod {
    /// Converts the method to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderMethod::Email => "email",
            ReminderMethod::Push => "push",
        }
    }
}

/// Reminder row
///
/// `method` is stored as its string form; [`ReminderMethod`] is the
/// validation-layer type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reminder {
    /// Unique reminder ID
    pub reminder_id: Uuid,

    /// Task the reminder belongs to
    pub task_id: Uuid,

    /// Scheduled delivery time
    pub remind_at: DateTime<Utc>,

    /// Delivery method ("email" | "push")
    pub method: String,
}

/// Input for creating a reminder
#[derive(Debug, Clone)]
pub struct CreateReminder {
    pub task_id: Uuid,
    pub remind_at: DateTime<Utc>,
    pub method: ReminderMethod,
}

impl Reminder {
    /// Creates a reminder with a generated id
    pub async fn create(pool: &PgPool, data: CreateReminder) -> Result<Self, sqlx::Error> {
        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (reminder_id, task_id, remind_at, method)
            VALUES ($1, $2, $3, $4)
            RETURNING reminder_id, task_id, remind_at, method
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.task_id)
        .bind(data.remind_at)
        .bind(data.method.as_str())
        .fetch_one(pool)
        .await?;

        Ok(reminder)
    }

    /// Deletes a reminder; returns true if it existed
    pub async fn delete(pool: &PgPool, reminder_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reminders WHERE reminder_id = $1")
            .bind(reminder_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the reminders on a task, soonest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let reminders = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT reminder_id, task_id, remind_at, method
            FROM reminders
            WHERE task_id = $1
            ORDER BY remind_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(reminders)
    }
}
