//! Music month command handlers
//!
//! Handles: musicsetup, musicmonth, musicprompt
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Long listings split across follow-up messages
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use log::{debug, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::{
    respond, respond_all, CommandContext, NOT_SET_UP_MUSIC_MONTHS,
};
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_integer_option, get_string_option};
use crate::core::{code_block_messages, BotError};
use crate::features::music_month::{
    fetch_month_document, resolve_prompt, MonthFileError, PeriodPromptSet, PeriodStore,
    PeriodWindow, ResolvedPeriod,
};

const LOOKUP_FAILED: &str = "Something went wrong at my end looking up music months";

/// Handler for music month commands
pub struct MusicHandler;

#[async_trait]
impl SlashCommandHandler for MusicHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["musicsetup", "musicmonth", "musicprompt"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "musicsetup" => {
                let url = get_string_option(&command.data.options, "file")
                    .ok_or_else(|| anyhow::anyhow!("Missing file parameter"))?;
                let user_id = command.user.id.to_string();
                // Fetching can outlast the initial response deadline
                command.defer(&serenity_ctx.http).await?;
                let reply = setup_month(&ctx, &user_id, &url).await;
                command
                    .create_followup_message(&serenity_ctx.http, |msg| msg.content(reply))
                    .await?;
                Ok(())
            }
            "musicmonth" => {
                let messages = month_overview(&ctx, Utc::now()).await;
                respond_all(serenity_ctx, command, messages).await
            }
            "musicprompt" => {
                let day = get_integer_option(&command.data.options, "day");
                let reply = prompt_for_day(&ctx, day, Utc::now()).await;
                respond(serenity_ctx, command, reply, false).await
            }
            _ => Ok(()),
        }
    }
}

/// Load a month from `url` on behalf of `user_id`
pub async fn setup_month(ctx: &CommandContext, user_id: &str, url: &str) -> String {
    let Some(store) = ctx.periods.as_ref() else {
        return NOT_SET_UP_MUSIC_MONTHS.to_string();
    };
    if !ctx.is_owner(user_id) {
        info!("User {user_id} tried to set up a music month without being the owner");
        return "Please ask the bot owner to set this up!".to_string();
    }

    let settings = &ctx.settings;
    match fetch_month_document(
        url,
        settings.month_file_max_bytes,
        settings.month_file_timeout_secs,
    )
    .await
    {
        Ok(set) => save_month(store.as_ref(), &set).await,
        Err(e) => {
            match &e {
                MonthFileError::Fetch(_) | MonthFileError::Read(_) => {
                    warn!("Couldn't load month file {url}: {e}")
                }
                _ => debug!("Rejected month file {url}: {e}"),
            }
            e.user_message()
        }
    }
}

/// Persist a parsed month and produce the reply text
pub async fn save_month(store: &dyn PeriodStore, set: &PeriodPromptSet) -> String {
    match store.insert_period(set).await {
        Ok(id) => {
            info!(
                "Saved music month {id} starting {} with {} prompts",
                set.start_time,
                set.days.len()
            );
            format!(
                "Okay, I've set up a music month beginning on {}",
                set.pretty_start()
            )
        }
        Err(e) => {
            e.log("Failed to save music month");
            "Something went wrong at my end so I didn't save the month".to_string()
        }
    }
}

/// Messages describing the current or next month at `now`
pub async fn month_overview(ctx: &CommandContext, now: DateTime<Utc>) -> Vec<String> {
    let Some(store) = ctx.periods.as_ref() else {
        return vec![NOT_SET_UP_MUSIC_MONTHS.to_string()];
    };

    let window = PeriodWindow::current(now, ctx.settings.grace_days);
    match window.current_or_next(store.as_ref()).await {
        Ok(None) => vec!["No music month planned".to_string()],
        Ok(Some(ResolvedPeriod::Upcoming(set))) => code_block_messages(
            &format!(
                "There's no current music month; the next begins on {}\n",
                set.pretty_start()
            ),
            &set.listing(),
        ),
        Ok(Some(ResolvedPeriod::Active(set))) => {
            code_block_messages("Current music month:\n", &set.listing())
        }
        Err(e) => {
            e.log("Failed to look up music months");
            vec![LOOKUP_FAILED.to_string()]
        }
    }
}

/// Reply for `/musicprompt`, defaulting to today's day of the month
pub async fn prompt_for_day(ctx: &CommandContext, day: Option<i64>, now: DateTime<Utc>) -> String {
    let Some(store) = ctx.periods.as_ref() else {
        return NOT_SET_UP_MUSIC_MONTHS.to_string();
    };

    let requested = day.unwrap_or_else(|| i64::from(now.day()));
    let Ok(day) = u32::try_from(requested) else {
        return format!("No prompt found for day {requested}");
    };

    let window = PeriodWindow::current(now, ctx.settings.grace_days);
    let active = match window.active(store.as_ref()).await {
        Ok(active) => active,
        Err(e) => {
            e.log("Failed to look up the active music month");
            return LOOKUP_FAILED.to_string();
        }
    };

    let err = match resolve_prompt(active.as_ref(), day) {
        Ok(prompt) => return format!("Prompt for day {day}: {prompt}"),
        Err(e) => e,
    };

    err.log(&format!("No prompt for day {day}"));
    match err {
        BotError::NotFound { day } => format!("No prompt found for day {day}"),
        BotError::NoActivePeriod => "No currently active music month".to_string(),
        _ => LOOKUP_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::CommandSettings;
    use crate::database::Database;
    use crate::features::music_month::DayPrompt;
    use chrono::TimeZone;

    fn june(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn june_set() -> PeriodPromptSet {
        PeriodPromptSet {
            start_time: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            days: vec![DayPrompt::new(1, "A"), DayPrompt::new(3, "C")],
        }
    }

    fn settings() -> CommandSettings {
        CommandSettings {
            owner_id: Some("1".to_string()),
            grace_days: 1,
            month_file_max_bytes: 1024,
            month_file_timeout_secs: 1,
        }
    }

    async fn context_with(sets: &[PeriodPromptSet]) -> CommandContext {
        let db = Database::new(":memory:").await.unwrap();
        for set in sets {
            db.insert_period(set).await.unwrap();
        }
        CommandContext::new(settings()).with_database(db)
    }

    #[tokio::test]
    async fn test_prompt_for_requested_day() {
        let ctx = context_with(&[june_set()]).await;
        assert_eq!(
            prompt_for_day(&ctx, Some(3), june(10)).await,
            "Prompt for day 3: C"
        );
        assert_eq!(
            prompt_for_day(&ctx, Some(2), june(10)).await,
            "No prompt found for day 2"
        );
        assert_eq!(
            prompt_for_day(&ctx, Some(-4), june(10)).await,
            "No prompt found for day -4"
        );
    }

    #[tokio::test]
    async fn test_prompt_defaults_to_today() {
        let ctx = context_with(&[june_set()]).await;
        assert_eq!(prompt_for_day(&ctx, None, june(1)).await, "Prompt for day 1: A");
    }

    #[tokio::test]
    async fn test_prompt_without_active_month() {
        let ctx = context_with(&[june_set()]).await;
        let august = Utc.with_ymd_and_hms(2024, 8, 3, 0, 0, 0).unwrap();
        assert_eq!(
            prompt_for_day(&ctx, Some(3), august).await,
            "No currently active music month"
        );
    }

    #[tokio::test]
    async fn test_overview_active_month() {
        let ctx = context_with(&[june_set()]).await;
        assert_eq!(
            month_overview(&ctx, june(10)).await,
            vec!["Current music month:\n```\nJune 1: A\nJune 3: C\n```".to_string()]
        );
    }

    #[tokio::test]
    async fn test_overview_upcoming_and_empty() {
        let ctx = context_with(&[june_set()]).await;
        let may = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let messages = month_overview(&ctx, may).await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0]
            .starts_with("There's no current music month; the next begins on June 1, 2024"));

        let empty = context_with(&[]).await;
        assert_eq!(
            month_overview(&empty, may).await,
            vec!["No music month planned".to_string()]
        );
    }

    #[tokio::test]
    async fn test_setup_requires_owner() {
        let ctx = context_with(&[]).await;
        assert_eq!(
            setup_month(&ctx, "2", "https://example.com/june.json").await,
            "Please ask the bot owner to set this up!"
        );
        assert_eq!(
            setup_month(&ctx, "1", "https://example.com/june.txt").await,
            "Give me a .json file"
        );
    }

    #[tokio::test]
    async fn test_save_month_reply() {
        let db = Database::new(":memory:").await.unwrap();
        assert_eq!(
            save_month(&db, &june_set()).await,
            "Okay, I've set up a music month beginning on June 1, 2024"
        );
    }

    #[tokio::test]
    async fn test_commands_without_store() {
        let ctx = CommandContext::new(settings());
        assert_eq!(
            prompt_for_day(&ctx, Some(1), june(1)).await,
            NOT_SET_UP_MUSIC_MONTHS
        );
        assert_eq!(
            month_overview(&ctx, june(1)).await,
            vec![NOT_SET_UP_MUSIC_MONTHS.to_string()]
        );
        assert_eq!(
            setup_month(&ctx, "1", "https://example.com/june.json").await,
            NOT_SET_UP_MUSIC_MONTHS
        );
    }
}
