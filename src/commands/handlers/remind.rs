//! Reminder command handler
//!
//! Handles: reminder
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Offsets go through the shared parser, store injected via context
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Duration;

use crate::commands::context::{respond, CommandContext, NOT_SET_UP_REMINDERS};
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;
use crate::features::reminders::{format_duration, parse_offset, Reminder, OFFSET_EXAMPLE};

/// Timestamps are stored to the second, so shorter offsets could persist as
/// already due
const MIN_OFFSET: Duration = Duration::from_secs(1);

/// Handler for /reminder
pub struct RemindHandler;

#[async_trait]
impl SlashCommandHandler for RemindHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["reminder"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let message = get_string_option(&command.data.options, "reminder")
            .ok_or_else(|| anyhow::anyhow!("Missing reminder parameter"))?;
        let when = get_string_option(&command.data.options, "when")
            .ok_or_else(|| anyhow::anyhow!("Missing when parameter"))?;

        let reply = create_reminder(&ctx, &user_id, &message, &when, Utc::now()).await;
        respond(serenity_ctx, command, reply, false).await
    }
}

fn invalid_offset_reply() -> String {
    format!(
        "That's not the right date or time format. Example: {OFFSET_EXAMPLE} for a reminder in 5 days, 3 hours and 30 minutes"
    )
}

/// Schedule a reminder for `user_id` and produce the reply text
pub async fn create_reminder(
    ctx: &CommandContext,
    user_id: &str,
    message: &str,
    when: &str,
    now: DateTime<Utc>,
) -> String {
    let Some(store) = ctx.reminders.as_ref() else {
        return NOT_SET_UP_REMINDERS.to_string();
    };

    let offset = match parse_offset(when) {
        Ok(offset) if offset >= MIN_OFFSET => offset,
        Ok(offset) => {
            debug!("Rejected reminder offset '{when}' ({offset:?}) from user {user_id}");
            return invalid_offset_reply();
        }
        Err(e) => {
            e.log(&format!("Rejected reminder offset '{when}' from user {user_id}"));
            return invalid_offset_reply();
        }
    };

    let Some(due_at) = chrono::Duration::from_std(offset)
        .ok()
        .and_then(|offset| now.checked_add_signed(offset))
    else {
        return invalid_offset_reply();
    };

    let reminder = Reminder::new(user_id, message, due_at);
    match store.insert_reminder(&reminder).await {
        Ok(id) => {
            info!("Created reminder {id} for user {user_id} due at {due_at}");
            format!(
                "Okay, I've set a reminder up to remind you of {message} in {}",
                format_duration(offset)
            )
        }
        Err(e) => {
            e.log(&format!("Failed to save reminder for user {user_id}"));
            "Something went wrong at my end so I didn't save your reminder".to_string()
        }
    }
}
