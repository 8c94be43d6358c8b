use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use birdass::commands::{
    create_all_handlers, register_global_commands, register_guild_commands, CommandContext,
    CommandRegistry, CommandSettings,
};
use birdass::core::Config;
use birdass::database::Database;
use birdass::features::reminders::{DiscordNotifier, ReminderScheduler};

struct Handler {
    registry: CommandRegistry,
    context: Arc<CommandContext>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        let registered = match self.guild_id {
            Some(guild_id) => register_guild_commands(&ctx, guild_id).await,
            None => register_global_commands(&ctx).await,
        };
        if let Err(e) = registered {
            error!("Failed to register slash commands: {e}");
        }

        info!("Ready to birdass");
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };

        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] /{} from user {}",
            command.data.name, command.user.id
        );

        match self
            .registry
            .dispatch(self.context.clone(), &ctx, &command)
            .await
        {
            Ok(true) => debug!("[{request_id}] Handled /{}", command.data.name),
            Ok(false) => warn!("[{request_id}] No handler for /{}", command.data.name),
            Err(e) => {
                error!(
                    "[{request_id}] Error handling slash command '{}': {e}",
                    command.data.name
                );

                let error_message = "❌ Sorry, I encountered an error processing your command.";
                // Deferred commands are answered by editing the deferred response
                if command
                    .edit_original_interaction_response(&ctx.http, |response| {
                        response.content(error_message)
                    })
                    .await
                    .is_err()
                {
                    let _ = command
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(serenity::model::application::interaction::InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(error_message).ephemeral(true)
                                })
                        })
                        .await;
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting birdass...");

    // Without a database the bot still runs, minus reminders and music months
    let database = match Database::new(&config.database_path).await {
        Ok(database) => Some(database),
        Err(e) => {
            error!("Couldn't open database at {}: {e:#}", config.database_path);
            None
        }
    };

    let mut context = CommandContext::new(CommandSettings::from(&config));
    if let Some(database) = database.clone() {
        context = context.with_database(database);
    }

    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler {
        registry: CommandRegistry::from_handlers(create_all_handlers()),
        context: Arc::new(context),
        guild_id,
    };

    let intents = GatewayIntents::GUILDS | GatewayIntents::DIRECT_MESSAGES;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    // Start the reminder scheduler
    let scheduler = database.map(|database| {
        let notifier = DiscordNotifier::new(client.cache_and_http.http.clone());
        ReminderScheduler::new(
            Arc::new(database),
            Arc::new(notifier),
            Duration::from_secs(config.reminder_interval_secs),
        )
        .spawn()
    });
    if scheduler.is_none() {
        warn!("Reminder scheduler not started, no database available");
    }

    let shard_manager = client.shard_manager.clone();
    let shutdown = scheduler.as_ref().map(|handle| handle.shutdown_token());
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Couldn't listen for Ctrl-C: {e}");
            return;
        }
        info!("Shutting down...");
        if let Some(token) = shutdown {
            token.cancel();
        }
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");

    let started = client.start().await;

    if let Some(handle) = scheduler {
        handle.stop().await;
    }

    if let Err(why) = started {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    info!("Bye");
    Ok(())
}
