//! Domain error taxonomy
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial taxonomy shared by reminders and music months

use log::{debug, error};
use thiserror::Error;

/// Errors raised by the reminder and music month features
///
/// `InvalidFormat`, `NotFound` and `NoActivePeriod` are user-facing conditions
/// and are rendered as replies. The remaining variants are infrastructure
/// failures and get logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BotError {
    /// User input was malformed (offset string, payload, file suffix)
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// The persistent store could not be reached or rejected the operation
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A delivery channel to the recipient could not be opened
    #[error("recipient {recipient_id} unreachable: {reason}")]
    RecipientUnreachable { recipient_id: String, reason: String },

    /// The channel was open but the message was not accepted
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),

    /// The active period has no prompt for the requested day
    #[error("no prompt found for day {day}")]
    NotFound { day: u32 },

    /// No period is active for the current window
    #[error("no active period")]
    NoActivePeriod,
}

impl BotError {
    /// True for conditions that are answered to the user rather than logged
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            BotError::InvalidFormat(_) | BotError::NotFound { .. } | BotError::NoActivePeriod
        )
    }

    /// Log a failed `action`, at debug level for user-facing conditions
    pub fn log(&self, action: &str) {
        if self.is_user_facing() {
            debug!("{action}: {self}");
        } else {
            error!("{action}: {self}");
        }
    }
}

impl From<sqlite::Error> for BotError {
    fn from(err: sqlite::Error) -> Self {
        BotError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::InvalidFormat(err.to_string())
    }
}
