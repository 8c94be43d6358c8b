//! Self-service role handlers
//!
//! Handles: addrole, removerole
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::id::RoleId;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::{respond, CommandContext};
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_role_option;

/// Handler for role commands
pub struct RoleHandler;

#[async_trait]
impl SlashCommandHandler for RoleHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["addrole", "removerole"]
    }

    async fn handle(
        &self,
        _ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let adding = command.data.name == "addrole";

        let Some(mut member) = command.member.clone() else {
            return respond(serenity_ctx, command, "Roles only work inside a server", true).await;
        };
        let role_id = get_role_option(&command.data.options, "role")
            .ok_or_else(|| anyhow::anyhow!("Missing role parameter"))?;
        let role = RoleId(role_id);

        let outcome = if adding {
            member.add_role(&serenity_ctx.http, role).await
        } else {
            member.remove_role(&serenity_ctx.http, role).await
        };

        let user_id = command.user.id;
        let reply = match outcome {
            Ok(()) => {
                info!(
                    "{} role {role_id} for user {user_id}",
                    if adding { "Added" } else { "Removed" }
                );
                role_reply(adding, true)
            }
            Err(e) => {
                warn!("Couldn't change role {role_id} for user {user_id}: {e}");
                role_reply(adding, false)
            }
        };
        respond(serenity_ctx, command, reply, true).await
    }
}

fn role_reply(adding: bool, succeeded: bool) -> &'static str {
    match (adding, succeeded) {
        (true, true) => "Added the role",
        (false, true) => "Removed the role",
        (true, false) => "I couldn't add that role, it might be above mine",
        (false, false) => "I couldn't remove that role, it might be above mine",
    }
}
