//! songbird-backed [`VoiceGateway`].
//!
//! The daemon writes raw PCM (s16le, 44.1 kHz, stereo) into a FIFO. ffmpeg
//! reads it and resamples to the 48 kHz float stream songbird plays.

use crate::config::VoiceConfig;
use crate::error::VoiceError;
use crate::transport::{ChannelId, GuildId};
use crate::voice::VoiceGateway;
use async_trait::async_trait;
use parking_lot::Mutex;
use serenity::all::Cache;
use serenity::model::id as discord_id;
use songbird::Songbird;
use songbird::input::core::io::ReadOnlySource;
use songbird::input::{ChildContainer, Input, RawAdapter};
use songbird::tracks::TrackHandle;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

const OUTPUT_RATE: u32 = 48_000;
const OUTPUT_CHANNELS: u32 = 2;

fn guild_id(guild: GuildId) -> discord_id::GuildId {
    discord_id::GuildId::new(guild.0)
}

pub struct SongbirdGateway {
    songbird: Arc<Songbird>,
    cache: OnceLock<Arc<Cache>>,
    fifo_path: PathBuf,
    ffmpeg_path: String,
    tracks: Mutex<HashMap<GuildId, TrackHandle>>,
}

impl SongbirdGateway {
    pub fn new(songbird: Arc<Songbird>, config: &VoiceConfig) -> Self {
        Self {
            songbird,
            cache: OnceLock::new(),
            fifo_path: config.fifo_path.clone(),
            ffmpeg_path: config.ffmpeg_path.clone(),
            tracks: Mutex::new(HashMap::new()),
        }
    }

    /// The gateway cache only exists once the client is built.
    pub fn attach_cache(&self, cache: Arc<Cache>) {
        if self.cache.set(cache).is_err() {
            debug!("voice gateway cache already attached");
        }
    }

    fn spawn_ffmpeg(&self) -> Result<ChildContainer, VoiceError> {
        let child = Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-loglevel", "error"])
            .args(["-f", "s16le", "-ar", "44100", "-ac", "2", "-i"])
            .arg(&self.fifo_path)
            .args(["-f", "f32le", "-ar", "48000", "-ac", "2", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(ChildContainer::from(child))
    }

    fn stop_track(&self, guild: GuildId) {
        if let Some(track) = self.tracks.lock().remove(&guild)
            && let Err(e) = track.stop()
        {
            debug!(guild = %guild, error = %e, "previous track already finished");
        }
    }
}

#[async_trait]
impl VoiceGateway for SongbirdGateway {
    async fn connected_channel(&self, guild: GuildId) -> Option<ChannelId> {
        let call = self.songbird.get(guild_id(guild))?;
        let channel = call.lock().await.current_channel()?;
        Some(ChannelId(channel.0.get()))
    }

    async fn connect(&self, guild: GuildId, channel: ChannelId) -> Result<(), VoiceError> {
        self.songbird
            .join(guild_id(guild), discord_id::ChannelId::new(channel.0))
            .await
            .map_err(|e| VoiceError::Join(e.to_string()))?;
        Ok(())
    }

    async fn start_stream(&self, guild: GuildId) -> Result<(), VoiceError> {
        let call = self
            .songbird
            .get(guild_id(guild))
            .ok_or(VoiceError::NotConnected)?;

        let source = self.spawn_ffmpeg()?;
        let input: Input =
            RawAdapter::new(ReadOnlySource::new(source), OUTPUT_RATE, OUTPUT_CHANNELS).into();

        let track = call.lock().await.play_only_input(input);
        self.stop_track(guild);
        self.tracks.lock().insert(guild, track);
        debug!(guild = %guild, fifo = %self.fifo_path.display(), "stream started");
        Ok(())
    }

    async fn disconnect(&self, guild: GuildId) -> Result<(), VoiceError> {
        self.stop_track(guild);
        self.songbird
            .remove(guild_id(guild))
            .await
            .map_err(|e| VoiceError::Leave(e.to_string()))
    }

    fn member_count(&self, guild: GuildId, channel: ChannelId) -> usize {
        let Some(cache) = self.cache.get() else {
            warn!("member count requested before the cache was attached");
            return 0;
        };
        let Some(guild) = cache.guild(guild_id(guild)) else {
            return 0;
        };
        guild
            .voice_states
            .values()
            .filter(|state| state.channel_id.is_some_and(|c| c.get() == channel.0))
            .count()
    }
}
