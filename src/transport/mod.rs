//! Chat transport boundary.
//!
//! The core never talks to Discord directly: it sends and edits messages and
//! manages reactions through [`ChatTransport`], and receives events as the
//! plain structs defined here. [`discord`] provides the serenity-backed
//! implementation.

pub mod discord;

use crate::error::TransportError;
use crate::render::RenderSpec;
use async_trait::async_trait;
use std::fmt;

macro_rules! snowflake {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub u64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

snowflake! {
    /// A guild (server).
    GuildId,
    /// A text or voice channel.
    ChannelId,
    /// A message.
    MessageId,
    /// A user account.
    UserId,
}

/// Handle to a message the bot has sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: ChannelId,
    pub id: MessageId,
    /// Plain-text content as sent; `None` for embed-only messages.
    pub content: Option<String>,
}

/// A reaction added to some message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub message_id: MessageId,
    pub user_id: UserId,
    /// Unicode emoji, or the `<:name:id>` form for custom emoji.
    pub symbol: String,
}

/// Outbound operations the core needs from the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a new message to a channel.
    async fn send_message(
        &self,
        channel: ChannelId,
        body: &RenderSpec,
    ) -> Result<SentMessage, TransportError>;

    /// Replace the text content of a sent message.
    async fn edit_message(&self, message: &SentMessage, text: &str) -> Result<(), TransportError>;

    /// Delete a sent message.
    async fn delete_message(&self, message: &SentMessage) -> Result<(), TransportError>;

    /// React to a message as the bot.
    async fn add_reaction(&self, message: &SentMessage, symbol: &str)
    -> Result<(), TransportError>;

    /// Remove a reaction. `None` removes the bot's own reaction.
    async fn remove_reaction(
        &self,
        message: &SentMessage,
        symbol: &str,
        user: Option<UserId>,
    ) -> Result<(), TransportError>;
}
