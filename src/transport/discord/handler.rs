//! Gateway event handler.

use crate::bot::Bot;
use crate::commands::Invocation;
use crate::transport::{ChannelId, GuildId, MessageId, ReactionEvent, UserId};
use crate::voice::VoiceChannel;
use async_trait::async_trait;
use serenity::all::{
    Cache, Context, EventHandler, Message, Reaction, Ready, VoiceState,
};
use serenity::model::id as discord_id;
use std::sync::Arc;
use tracing::{debug, info};

/// Voice channel `user` is in, read from the cache.
///
/// Synchronous so the cache guard cannot be held across an await.
pub(super) fn voice_channel_of(
    cache: &Cache,
    guild: discord_id::GuildId,
    user: discord_id::UserId,
) -> Option<VoiceChannel> {
    let guild = cache.guild(guild)?;
    let channel_id = guild.voice_states.get(&user)?.channel_id?;
    let name = guild
        .channels
        .get(&channel_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| channel_id.to_string());
    Some(VoiceChannel {
        id: ChannelId(channel_id.get()),
        name,
    })
}

/// Feeds serenity events into [`Bot`].
pub struct BotEventHandler {
    bot: Arc<Bot>,
}

impl BotEventHandler {
    pub fn new(bot: Arc<Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl EventHandler for BotEventHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, id = %ready.user.id, guilds = ready.guilds.len(), "connected to Discord");
        self.bot.set_bot_user(UserId(ready.user.id.get()));
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let author_voice = msg
            .guild_id
            .and_then(|guild| voice_channel_of(&ctx.cache, guild, msg.author.id));

        let invocation = Invocation {
            channel_id: ChannelId(msg.channel_id.get()),
            guild_id: msg.guild_id.map(|g| GuildId(g.get())),
            author: UserId(msg.author.id.get()),
            author_voice,
            content: msg.content,
        };
        self.bot.on_message(invocation).await;
    }

    async fn reaction_add(&self, _ctx: Context, reaction: Reaction) {
        let Some(user) = reaction.user_id else {
            return;
        };
        let event = ReactionEvent {
            message_id: MessageId(reaction.message_id.get()),
            user_id: UserId(user.get()),
            symbol: reaction.emoji.to_string(),
        };
        if !self.bot.on_reaction(event).await {
            debug!(message = %reaction.message_id, "reaction outside any selection");
        }
    }

    async fn message_delete(
        &self,
        _ctx: Context,
        _channel_id: discord_id::ChannelId,
        deleted_message_id: discord_id::MessageId,
        _guild_id: Option<discord_id::GuildId>,
    ) {
        self.bot
            .on_message_deleted(MessageId(deleted_message_id.get()));
    }

    async fn voice_state_update(&self, _ctx: Context, _old: Option<VoiceState>, new: VoiceState) {
        if let Some(guild) = new.guild_id {
            // The idle check runs detached; its result is only logged.
            let _ = self.bot.on_voice_state_change(GuildId(guild.get())).await;
        }
    }
}
