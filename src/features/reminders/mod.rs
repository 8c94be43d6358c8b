//! # Reminders Feature
//!
//! Relative-offset reminders delivered by DM from a polling scheduler.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod duration;
pub mod notifier;
pub mod scheduler;
pub mod store;

pub use duration::{format_duration, format_offset, parse_offset, OFFSET_EXAMPLE};
pub use notifier::{notify, ChannelHandle, DiscordNotifier, NotificationSink};
pub use scheduler::{ReminderScheduler, SchedulerHandle, TickReport};
pub use store::{DueReminders, Reminder, ReminderId, ReminderStore, StoredReminder};
