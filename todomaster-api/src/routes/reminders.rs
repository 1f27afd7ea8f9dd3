/// Reminder endpoints
///
/// # Endpoints
///
/// - `POST /api/reminders` - Schedule a reminder
/// - `DELETE /api/reminders/:reminder_id` - Cancel a reminder
/// - `GET /api/tasks/:task_id/reminders` - Reminders on a task
///
/// Scheduling a reminder dispatches a notification carrying the task's
/// title to the task owner through the notification port.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use todomaster_shared::{
    models::{
        reminder::{CreateReminder, Reminder, ReminderMethod},
        task::Task,
        user::User,
    },
    notify::NotificationPayload,
};
use uuid::Uuid;

/// Reminder creation request
#[derive(Debug, Deserialize)]
pub struct CreateReminderRequest {
    pub task_id: Uuid,

    /// Scheduled delivery time (RFC 3339)
    pub remind_at: DateTime<Utc>,

    /// Delivery method (defaults to "email")
    #[serde(default)]
    pub method: ReminderMethod,
}

/// Schedule a reminder
///
/// # Endpoint
///
/// ```text
/// POST /api/reminders
/// Content-Type: application/json
///
/// { "task_id": "...", "remind_at": "2024-06-01T09:00:00Z", "method": "email" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: malformed time or unknown method
/// - `404 Not Found`: task does not resolve
pub async fn create_reminder(
    State(state): State<AppState>,
    Json(req): Json<CreateReminderRequest>,
) -> ApiResult<(StatusCode, Json<Reminder>)> {
    let task = Task::find_by_id(&state.db, req.task_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;

    let reminder = Reminder::create(
        &state.db,
        CreateReminder {
            task_id: req.task_id,
            remind_at: req.remind_at,
            method: req.method,
        },
    )
    .await?;

    // Owner may have been removed out from under the task; skip dispatch
    // rather than failing the create
    if let Some(owner) = User::find_by_id(&state.db, task.user_id).await? {
        let payload = NotificationPayload::new(
            "Reminder scheduled",
            format!(
                "A reminder for \"{}\" is set for {}.",
                task.title,
                reminder.remind_at.to_rfc3339()
            ),
        );
        state.notifier.send(&owner.email, payload).await?;
    }

    Ok((StatusCode::CREATED, Json(reminder)))
}

/// Cancel a reminder
pub async fn delete_reminder(
    State(state): State<AppState>,
    Path(reminder_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Reminder::delete(&state.db, reminder_id).await?;

    if !deleted {
        return Err(ApiError::not_found("Reminder"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Reminders on a task, soonest first
pub async fn list_task_reminders(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Reminder>>> {
    if Task::find_by_id(&state.db, task_id).await?.is_none() {
        return Err(ApiError::not_found("Task"));
    }

    let reminders = Reminder::list_by_task(&state.db, task_id).await?;

    Ok(Json(reminders))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_method_defaults_to_email() {
        let json = r#"{"task_id":"5f0c1f5a-0002-4b6e-9d3a-1a2b3c4d5e6f","remind_at":"2024-06-01T09:00:00Z"}"#;
        let req: CreateReminderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.method, ReminderMethod::Email);
    }

    #[test]
    fn test_create_request_rejects_invalid_time() {
        let json = r#"{"task_id":"5f0c1f5a-0002-4b6e-9d3a-1a2b3c4d5e6f","remind_at":"tomorrow"}"#;
        assert!(serde_json::from_str::<CreateReminderRequest>(json).is_err());
    }

    #[test]
    fn test_create_request_rejects_unknown_method() {
        let json = r#"{"task_id":"5f0c1f5a-0002-4b6e-9d3a-1a2b3c4d5e6f","remind_at":"2024-06-01T09:00:00Z","method":"fax"}"#;
        assert!(serde_json::from_str::<CreateReminderRequest>(json).is_err());
    }
}
