//! Reminder records and the store interface the scheduler consumes
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Store access behind the `ReminderStore` trait for injection
//! - 1.0.0: Tuple rows read straight from the database

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::BotError;

/// Identity of a persisted reminder
pub type ReminderId = i64;

/// A reminder as requested by a user, before it has an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Opaque id of the user to notify
    pub recipient_id: String,
    pub message: String,
    /// Delivery becomes eligible once this instant has passed
    pub due_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(
        recipient_id: impl Into<String>,
        message: impl Into<String>,
        due_at: DateTime<Utc>,
    ) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            message: message.into(),
            due_at,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at < now
    }

    /// Text delivered to the recipient
    pub fn notification_text(&self) -> String {
        format!(
            "Hi there! You asked me to remind you about {} - this is that reminder!",
            self.message
        )
    }
}

/// A reminder read back from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReminder {
    pub id: ReminderId,
    pub reminder: Reminder,
}

/// One-shot sequence of due reminders produced by a single query
pub type DueReminders = std::vec::IntoIter<StoredReminder>;

/// Persistent collection of reminders
///
/// Each operation is atomic on its own; nothing spans operations.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Append a new reminder, returning its identity
    async fn insert_reminder(&self, reminder: &Reminder) -> Result<ReminderId, BotError>;

    /// All reminders with `due_at < now`, in no particular order
    async fn due_reminders(&self, now: DateTime<Utc>) -> Result<DueReminders, BotError>;

    /// Remove a reminder by identity
    async fn delete_reminder(&self, id: ReminderId) -> Result<(), BotError>;
}
