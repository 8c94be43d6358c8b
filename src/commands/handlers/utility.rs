//! Utility command handlers
//!
//! Handles: birdass, bogart, bigemoji, suggestion
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Suggestions delivered through the notification sink
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::{respond, CommandContext};
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;
use crate::features::emoji::{emoji_url, BOGART_URL};
use crate::features::reminders::{notify, DiscordNotifier, NotificationSink};

/// Handler for utility commands
pub struct UtilityHandler;

#[async_trait]
impl SlashCommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["birdass", "bogart", "bigemoji", "suggestion"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "birdass" => respond(serenity_ctx, command, "just birdass", false).await,
            "bogart" => respond(serenity_ctx, command, BOGART_URL, false).await,
            "bigemoji" => {
                let input = get_string_option(&command.data.options, "emoji").unwrap_or_default();
                let (reply, ephemeral) = bigemoji_reply(&input);
                respond(serenity_ctx, command, reply, ephemeral).await
            }
            "suggestion" => {
                let text = get_string_option(&command.data.options, "suggestion")
                    .ok_or_else(|| anyhow::anyhow!("Missing suggestion parameter"))?;
                let sink = DiscordNotifier::new(serenity_ctx.http.clone());
                let reply = forward_suggestion(&ctx, &sink, &command.user.name, &text).await;
                respond(serenity_ctx, command, reply, true).await
            }
            _ => Ok(()),
        }
    }
}

/// Reply for `/bigemoji` and whether only the caller should see it
pub fn bigemoji_reply(input: &str) -> (String, bool) {
    match emoji_url(input) {
        Some(url) => (url, false),
        None => (
            "That needs to be a custom emoji from a server".to_string(),
            true,
        ),
    }
}

/// Pass a suggestion on to the owner
pub async fn forward_suggestion(
    ctx: &CommandContext,
    sink: &dyn NotificationSink,
    author: &str,
    text: &str,
) -> &'static str {
    let Some(owner) = ctx.settings.owner_id.as_deref() else {
        return "Nobody's set up to receive suggestions, sorry";
    };

    match notify(sink, owner, &format!("Suggestion from {author}: {text}")).await {
        Ok(()) => {
            info!("Forwarded a suggestion from {author}");
            "Thanks, I've passed that on!"
        }
        Err(e) => {
            warn!("Couldn't forward suggestion from {author}: {e}");
            "I couldn't pass that on right now, try again later"
        }
    }
}
