//! Discord transport built on serenity, with songbird for voice.

mod handler;
mod voice;

pub use handler::BotEventHandler;
pub use voice::SongbirdGateway;

use super::{ChannelId, ChatTransport, MessageId, SentMessage, UserId};
use crate::art::{ArtResolver, Grabber, NoArt};
use crate::bot::{Bot, Collaborators};
use crate::config::Config;
use crate::daemon::DaemonActor;
use crate::error::TransportError;
use crate::render::{Embed, RenderSpec};
use async_trait::async_trait;
use serenity::all::{
    CreateEmbed, CreateMessage, EditMessage, GatewayIntents, Http, ReactionType,
};
use serenity::model::id as discord_id;
use serenity::Client;
use songbird::Songbird;
use std::sync::Arc;
use tracing::{info, warn};

fn channel(id: ChannelId) -> discord_id::ChannelId {
    discord_id::ChannelId::new(id.0)
}

fn message(id: MessageId) -> discord_id::MessageId {
    discord_id::MessageId::new(id.0)
}

fn reaction(symbol: &str) -> Result<ReactionType, TransportError> {
    ReactionType::try_from(symbol).map_err(|_| TransportError::InvalidSymbol(symbol.to_string()))
}

fn to_create_embed(embed: &Embed) -> CreateEmbed {
    let mut out = CreateEmbed::new()
        .title(embed.title.as_str())
        .colour(embed.colour);
    if !embed.description.is_empty() {
        out = out.description(embed.description.as_str());
    }
    if let Some(url) = &embed.thumbnail {
        out = out.thumbnail(url.as_str());
    }
    for field in &embed.fields {
        out = out.field(field.name.as_str(), field.value.as_str(), field.inline);
    }
    out
}

/// [`ChatTransport`] over the Discord REST API.
pub struct DiscordTransport {
    http: Arc<Http>,
}

impl DiscordTransport {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChatTransport for DiscordTransport {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        body: &RenderSpec,
    ) -> Result<SentMessage, TransportError> {
        let builder = match body {
            RenderSpec::PlainText(text) => CreateMessage::new().content(text.as_str()),
            RenderSpec::Embed(embed) => CreateMessage::new().embed(to_create_embed(embed)),
        };
        let sent = channel(channel_id)
            .send_message(&self.http, builder)
            .await?;
        Ok(SentMessage {
            channel_id,
            id: MessageId(sent.id.get()),
            content: body.text().map(String::from),
        })
    }

    async fn edit_message(&self, sent: &SentMessage, text: &str) -> Result<(), TransportError> {
        channel(sent.channel_id)
            .edit_message(&self.http, message(sent.id), EditMessage::new().content(text))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, sent: &SentMessage) -> Result<(), TransportError> {
        channel(sent.channel_id)
            .delete_message(&self.http, message(sent.id))
            .await?;
        Ok(())
    }

    async fn add_reaction(&self, sent: &SentMessage, symbol: &str) -> Result<(), TransportError> {
        channel(sent.channel_id)
            .create_reaction(&self.http, message(sent.id), reaction(symbol)?)
            .await?;
        Ok(())
    }

    async fn remove_reaction(
        &self,
        sent: &SentMessage,
        symbol: &str,
        user: Option<UserId>,
    ) -> Result<(), TransportError> {
        channel(sent.channel_id)
            .delete_reaction(
                &self.http,
                message(sent.id),
                user.map(|u| discord_id::UserId::new(u.0)),
                reaction(symbol)?,
            )
            .await?;
        Ok(())
    }
}

fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::GUILD_VOICE_STATES
}

/// Connect to Discord and serve until the gateway connection ends.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let http = Arc::new(Http::new(&config.token));
    let transport: Arc<dyn ChatTransport> = Arc::new(DiscordTransport::new(Arc::clone(&http)));

    let songbird = Songbird::serenity();
    let gateway = Arc::new(SongbirdGateway::new(Arc::clone(&songbird), &config.voice));

    let daemon = DaemonActor::spawn_tcp(
        config.mpd.server.clone(),
        config.mpd.port,
        config.mpd.timeout(),
    );

    let art: Arc<dyn ArtResolver> = match &config.mpd.art_grabber {
        Some(grabber) => Arc::new(Grabber::new(grabber, config.mpd.timeout())?),
        None => {
            warn!("no [mpd.art_grabber] configured; embeds will have no album art");
            Arc::new(NoArt)
        }
    };

    let bot = Arc::new(Bot::new(
        &config,
        Collaborators {
            transport,
            voice: Arc::clone(&gateway) as _,
            daemon: Arc::new(daemon),
            art,
        },
    )?);

    let mut client = Client::builder(&config.token, intents())
        .event_handler(BotEventHandler::new(bot))
        .voice_manager_arc(songbird)
        .await?;
    gateway.attach_cache(Arc::clone(&client.cache));

    info!(server = %config.mpd.server, port = config.mpd.port, "starting mpdcord");
    client.start().await?;
    Ok(())
}
