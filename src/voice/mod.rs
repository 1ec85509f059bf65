//! Voice channel side effects.
//!
//! [`VoiceActionRunner`] carries out the join, pause and leave actions that
//! handlers request, and watches for the bot being left alone in a channel.
//! The actual voice connection sits behind [`VoiceGateway`].

mod runner;
mod watchdog;

pub use runner::{VoiceActionRunner, VoiceOutcome};

use crate::error::VoiceError;
use crate::transport::{ChannelId, GuildId};
use async_trait::async_trait;

/// A voice channel the invoking user is sitting in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChannel {
    pub id: ChannelId,
    pub name: String,
}

/// Voice connection operations.
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Channel the bot is connected to in `guild`, if any.
    async fn connected_channel(&self, guild: GuildId) -> Option<ChannelId>;

    async fn connect(&self, guild: GuildId, channel: ChannelId) -> Result<(), VoiceError>;

    /// Start piping the daemon's audio output into the connection.
    async fn start_stream(&self, guild: GuildId) -> Result<(), VoiceError>;

    async fn disconnect(&self, guild: GuildId) -> Result<(), VoiceError>;

    /// Members currently in a voice channel, the bot included.
    fn member_count(&self, guild: GuildId, channel: ChannelId) -> usize;
}
