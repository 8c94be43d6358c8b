// Core layer - shared types and configuration
pub mod core;

// Features layer - reminders, music months, emoji
pub mod features;

// Persistence
pub mod database;

// Application layer
pub mod commands;

pub use crate::core::{BotError, Config};
pub use database::Database;
pub use features::{
    parse_offset, NotificationSink, PeriodPromptSet, PeriodStore, PeriodWindow, Reminder,
    ReminderScheduler, ReminderStore, ResolvedPeriod, SchedulerHandle,
};
