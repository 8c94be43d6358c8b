//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Stores are injected as optional trait objects
//! - 1.0.0: Initial implementation with core shared state

use anyhow::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::core::Config;
use crate::database::Database;
use crate::features::music_month::PeriodStore;
use crate::features::reminders::ReminderStore;

/// Shown when a command needs a store the bot was started without
pub const NOT_SET_UP_REMINDERS: &str =
    "I haven't been set up to allow reminders, please moan at whoever set me up";
pub const NOT_SET_UP_MUSIC_MONTHS: &str =
    "I haven't been set up to allow music months, please moan at whoever set me up";

/// Settings handlers read from the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct CommandSettings {
    pub owner_id: Option<String>,
    pub grace_days: u32,
    pub month_file_max_bytes: u64,
    pub month_file_timeout_secs: u64,
}

impl From<&Config> for CommandSettings {
    fn from(config: &Config) -> Self {
        Self {
            owner_id: config.owner_id.clone(),
            grace_days: config.grace_days,
            month_file_max_bytes: config.month_file_max_bytes,
            month_file_timeout_secs: config.month_file_timeout_secs,
        }
    }
}

/// Shared context for all command handlers
///
/// Either store may be absent when the database could not be opened; the
/// commands that need it answer with a "not set up" message instead.
#[derive(Clone)]
pub struct CommandContext {
    pub reminders: Option<Arc<dyn ReminderStore>>,
    pub periods: Option<Arc<dyn PeriodStore>>,
    pub settings: CommandSettings,
}

impl CommandContext {
    /// Context with no stores attached
    pub fn new(settings: CommandSettings) -> Self {
        Self {
            reminders: None,
            periods: None,
            settings,
        }
    }

    /// Attach both stores backed by the same database
    pub fn with_database(mut self, database: Database) -> Self {
        let database = Arc::new(database);
        self.reminders = Some(database.clone());
        self.periods = Some(database);
        self
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.settings.owner_id.as_deref() == Some(user_id)
    }
}

/// Answer an interaction with a plain message
pub async fn respond(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: impl ToString,
    ephemeral: bool,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|msg| msg.content(content).ephemeral(ephemeral))
        })
        .await?;
    Ok(())
}

/// Answer with the first message and send the rest as follow-ups
pub async fn respond_all(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    messages: Vec<String>,
) -> Result<()> {
    let mut messages = messages.into_iter();
    let Some(first) = messages.next() else {
        return Ok(());
    };

    respond(serenity_ctx, command, first, false).await?;
    for message in messages {
        command
            .create_followup_message(&serenity_ctx.http, |msg| msg.content(message))
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_clone() {
        // CommandContext should be Clone for sharing across handlers
        fn assert_clone<T: Clone>() {}
        assert_clone::<CommandContext>();
    }

    #[test]
    fn test_owner_check() {
        let ctx = CommandContext::new(CommandSettings {
            owner_id: Some("42".to_string()),
            ..Default::default()
        });
        assert!(ctx.is_owner("42"));
        assert!(!ctx.is_owner("43"));

        let unowned = CommandContext::new(CommandSettings::default());
        assert!(!unowned.is_owner(""));
    }

    #[tokio::test]
    async fn test_with_database_attaches_both_stores() {
        let db = Database::new(":memory:").await.unwrap();
        let ctx = CommandContext::new(CommandSettings::default()).with_database(db);
        assert!(ctx.reminders.is_some());
        assert!(ctx.periods.is_some());
    }
}
