/// Notification dispatch port
///
/// Outbound notifications (password recovery mail, reminder delivery) go
/// through the [`Notifier`] trait so that handlers never talk to a provider
/// directly. The production binary wires in [`LogNotifier`]; tests use
/// [`MockNotifier`], which records every dispatch for assertions.
///
/// # Example
///
/// ```
/// use todomaster_shared::notify::{MockNotifier, NotificationPayload, Notifier};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let notifier = MockNotifier::new();
///
/// let payload = NotificationPayload::new("Reminder", "Buy milk");
/// let receipt = notifier.send("user@example.com", payload).await?;
/// assert!(!receipt.delivery_id.is_nil());
///
/// assert_eq!(notifier.sent().len(), 1);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Error type for notification dispatch
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Provider rejected or failed the dispatch
    #[error("Notification dispatch failed: {0}")]
    DispatchFailed(String),
}

/// Message content handed to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Short subject line
    pub subject: String,

    /// Message body
    pub body: String,
}

impl NotificationPayload {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Proof of acceptance returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Provider-side delivery ID
    pub delivery_id: Uuid,

    /// When the dispatch was accepted
    pub accepted_at: DateTime<Utc>,
}

impl DeliveryReceipt {
    fn issue() -> Self {
        Self {
            delivery_id: Uuid::new_v4(),
            accepted_at: Utc::now(),
        }
    }
}

/// Notification dispatch contract
///
/// A single operation: hand a payload to a recipient, get a receipt back.
/// Implementations must be shareable across request handlers.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatches a notification to the recipient
    async fn send(
        &self,
        recipient: &str,
        payload: NotificationPayload,
    ) -> Result<DeliveryReceipt, NotifyError>;
}

/// Tracing-backed notifier for development and default deployments
///
/// Logs the dispatch instead of contacting a real provider. A production
/// deployment swaps in a provider-backed implementation of [`Notifier`].
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        LogNotifier
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        recipient: &str,
        payload: NotificationPayload,
    ) -> Result<DeliveryReceipt, NotifyError> {
        let receipt = DeliveryReceipt::issue();
        info!(
            recipient = %recipient,
            subject = %payload.subject,
            delivery_id = %receipt.delivery_id,
            "Dispatching notification"
        );
        Ok(receipt)
    }
}

/// A dispatch recorded by [`MockNotifier`]
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub recipient: String,
    pub payload: NotificationPayload,
}

/// Recording notifier for tests
///
/// Accepts every dispatch and keeps it for later inspection.
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        MockNotifier {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of everything dispatched so far
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(
        &self,
        recipient: &str,
        payload: NotificationPayload,
    ) -> Result<DeliveryReceipt, NotifyError> {
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(SentNotification {
                recipient: recipient.to_string(),
                payload,
            });
        Ok(DeliveryReceipt::issue())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_notifier_records_dispatches() {
        let notifier = MockNotifier::new();

        notifier
            .send(
                "first@example.com",
                NotificationPayload::new("Reminder", "Buy milk"),
            )
            .await
            .unwrap();
        notifier
            .send(
                "second@example.com",
                NotificationPayload::new("Password recovery", "Follow the link"),
            )
            .await
            .unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].recipient, "first@example.com");
        assert_eq!(sent[0].payload.subject, "Reminder");
        assert_eq!(sent[1].recipient, "second@example.com");
    }

    #[tokio::test]
    async fn test_log_notifier_returns_receipt() {
        let notifier = LogNotifier::new();

        let receipt = notifier
            .send(
                "user@example.com",
                NotificationPayload::new("Subject", "Body"),
            )
            .await
            .unwrap();

        assert!(!receipt.delivery_id.is_nil());
    }

    #[test]
    fn test_payload_constructor() {
        let payload = NotificationPayload::new("Subject", "Body");
        assert_eq!(payload.subject, "Subject");
        assert_eq!(payload.body, "Body");
    }
}
