//! # SQLite persistence
//!
//! Backs the reminder and music month stores with a single sqlite file.
//! Timestamps are stored in UTC as `%Y-%m-%d %H:%M:%S` so that text ordering
//! matches time ordering.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Implement `ReminderStore` and `PeriodStore`, add period_prompt_sets table
//! - 1.0.0: Initial reminders table

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{info, warn};
use sqlite::{Connection, State};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::BotError;
use crate::features::music_month::{PeriodId, PeriodPromptSet, PeriodStore};
use crate::features::reminders::{
    DueReminders, Reminder, ReminderId, ReminderStore, StoredReminder,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS reminders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipient_id TEXT NOT NULL,
        message TEXT NOT NULL,
        due_at TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_reminders_due_at ON reminders(due_at);

    CREATE TABLE IF NOT EXISTS period_prompt_sets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        start_time TEXT NOT NULL,
        days TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_period_prompt_sets_start_time
        ON period_prompt_sets(start_time);
";

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema
    ///
    /// `":memory:"` gives a private in-memory database.
    pub async fn new(path: &str) -> Result<Self> {
        let connection =
            sqlite::open(path).with_context(|| format!("failed to open database at {path}"))?;
        connection
            .execute(SCHEMA)
            .context("failed to initialise database schema")?;

        info!("Database ready at {path}");
        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn last_insert_id(conn: &Connection) -> Result<i64, BotError> {
        let mut statement = conn.prepare("SELECT last_insert_rowid()")?;
        statement.next()?;
        Ok(statement.read::<i64, _>(0)?)
    }

    fn insert_reminder_sync(conn: &Connection, reminder: &Reminder) -> Result<ReminderId, BotError> {
        let due_at = format_timestamp(reminder.due_at);
        let mut statement =
            conn.prepare("INSERT INTO reminders (recipient_id, message, due_at) VALUES (?, ?, ?)")?;
        statement.bind((1, reminder.recipient_id.as_str()))?;
        statement.bind((2, reminder.message.as_str()))?;
        statement.bind((3, due_at.as_str()))?;
        statement.next()?;
        drop(statement);

        Self::last_insert_id(conn)
    }

    fn due_reminders_sync(
        conn: &Connection,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoredReminder>, BotError> {
        let now = format_timestamp(now);
        let mut statement = conn
            .prepare("SELECT id, recipient_id, message, due_at FROM reminders WHERE due_at < ?")?;
        statement.bind((1, now.as_str()))?;

        let mut due = Vec::new();
        while let State::Row = statement.next()? {
            let id = statement.read::<i64, _>("id")?;
            let raw_due_at = statement.read::<String, _>("due_at")?;
            let Some(due_at) = parse_timestamp(&raw_due_at) else {
                warn!("Skipping reminder {id} with unreadable due_at '{raw_due_at}'");
                continue;
            };

            due.push(StoredReminder {
                id,
                reminder: Reminder {
                    recipient_id: statement.read::<String, _>("recipient_id")?,
                    message: statement.read::<String, _>("message")?,
                    due_at,
                },
            });
        }
        Ok(due)
    }

    fn delete_reminder_sync(conn: &Connection, id: ReminderId) -> Result<(), BotError> {
        let mut statement = conn.prepare("DELETE FROM reminders WHERE id = ?")?;
        statement.bind((1, id))?;
        statement.next()?;
        Ok(())
    }

    fn insert_period_sync(conn: &Connection, set: &PeriodPromptSet) -> Result<PeriodId, BotError> {
        let start_time = format_timestamp(set.start_time);
        let days = serde_json::to_string(&set.days)?;
        let mut statement =
            conn.prepare("INSERT INTO period_prompt_sets (start_time, days) VALUES (?, ?)")?;
        statement.bind((1, start_time.as_str()))?;
        statement.bind((2, days.as_str()))?;
        statement.next()?;
        drop(statement);

        Self::last_insert_id(conn)
    }

    fn first_period_after_sync(
        conn: &Connection,
        after: DateTime<Utc>,
        before: Option<DateTime<Utc>>,
    ) -> Result<Option<PeriodPromptSet>, BotError> {
        let after = format_timestamp(after);
        let before = before.map(format_timestamp);

        let sql = if before.is_some() {
            "SELECT start_time, days FROM period_prompt_sets
             WHERE start_time > ? AND start_time < ?
             ORDER BY start_time ASC, id ASC LIMIT 1"
        } else {
            "SELECT start_time, days FROM period_prompt_sets
             WHERE start_time > ?
             ORDER BY start_time ASC, id ASC LIMIT 1"
        };

        let mut statement = conn.prepare(sql)?;
        statement.bind((1, after.as_str()))?;
        if let Some(before) = &before {
            statement.bind((2, before.as_str()))?;
        }

        if statement.next()? != State::Row {
            return Ok(None);
        }

        let raw_start = statement.read::<String, _>("start_time")?;
        let start_time = parse_timestamp(&raw_start).ok_or_else(|| {
            BotError::StoreUnavailable(format!("unreadable start_time '{raw_start}'"))
        })?;
        let days = serde_json::from_str(&statement.read::<String, _>("days")?)
            .map_err(|e| BotError::StoreUnavailable(format!("unreadable prompt list: {e}")))?;

        Ok(Some(PeriodPromptSet { start_time, days }))
    }
}

#[async_trait]
impl ReminderStore for Database {
    async fn insert_reminder(&self, reminder: &Reminder) -> Result<ReminderId, BotError> {
        let conn = self.connection.lock().await;
        Self::insert_reminder_sync(&conn, reminder)
    }

    async fn due_reminders(&self, now: DateTime<Utc>) -> Result<DueReminders, BotError> {
        let conn = self.connection.lock().await;
        Ok(Self::due_reminders_sync(&conn, now)?.into_iter())
    }

    async fn delete_reminder(&self, id: ReminderId) -> Result<(), BotError> {
        let conn = self.connection.lock().await;
        Self::delete_reminder_sync(&conn, id)
    }
}

#[async_trait]
impl PeriodStore for Database {
    async fn insert_period(&self, set: &PeriodPromptSet) -> Result<PeriodId, BotError> {
        let conn = self.connection.lock().await;
        Self::insert_period_sync(&conn, set)
    }

    async fn first_period_after(
        &self,
        after: DateTime<Utc>,
        before: Option<DateTime<Utc>>,
    ) -> Result<Option<PeriodPromptSet>, BotError> {
        let conn = self.connection.lock().await;
        Self::first_period_after_sync(&conn, after, before)
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
}
