//! Direct-message delivery
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.0.0
//!
//! ## Changelog
//! - 1.0.0: Notification sink trait with a Discord DM implementation

use async_trait::async_trait;
use log::debug;
use serenity::http::Http;
use serenity::model::id::{ChannelId, UserId};
use std::sync::Arc;

use crate::core::BotError;

/// Handle to an open delivery channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelHandle(pub String);

/// Somewhere notifications can be delivered to a recipient
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Open (or reuse) a private channel to the recipient
    async fn open_channel(&self, recipient_id: &str) -> Result<ChannelHandle, BotError>;

    /// Send text over an open channel
    async fn send(&self, channel: &ChannelHandle, text: &str) -> Result<(), BotError>;
}

/// Open a channel to `recipient_id` and send `text` over it
pub async fn notify(
    sink: &dyn NotificationSink,
    recipient_id: &str,
    text: &str,
) -> Result<(), BotError> {
    let channel = sink.open_channel(recipient_id).await?;
    sink.send(&channel, text).await
}

/// Delivers notifications as Discord direct messages
#[derive(Clone)]
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl NotificationSink for DiscordNotifier {
    async fn open_channel(&self, recipient_id: &str) -> Result<ChannelHandle, BotError> {
        let unreachable = |reason: String| BotError::RecipientUnreachable {
            recipient_id: recipient_id.to_string(),
            reason,
        };

        let user_id: u64 = recipient_id
            .parse()
            .map_err(|_| unreachable("not a Discord user id".to_string()))?;

        let dm = UserId(user_id)
            .create_dm_channel(&*self.http)
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        debug!("Opened DM channel {} for user {recipient_id}", dm.id);
        Ok(ChannelHandle(dm.id.0.to_string()))
    }

    async fn send(&self, channel: &ChannelHandle, text: &str) -> Result<(), BotError> {
        let channel_id: u64 = channel
            .0
            .parse()
            .map_err(|_| BotError::DeliveryFailed(format!("bad channel handle {}", channel.0)))?;

        ChannelId(channel_id)
            .say(&*self.http, text)
            .await
            .map_err(|e| BotError::DeliveryFailed(e.to_string()))?;

        Ok(())
    }
}
