//! # Features
//!
//! - **emoji**: custom emoji image lookup
//! - **music_month**: dated daily prompts
//! - **reminders**: deferred direct-message reminders

pub mod emoji;
pub mod music_month;
pub mod reminders;

pub use music_month::{PeriodPromptSet, PeriodStore, PeriodWindow, ResolvedPeriod};
pub use reminders::{
    parse_offset, NotificationSink, Reminder, ReminderScheduler, ReminderStore, SchedulerHandle,
};
