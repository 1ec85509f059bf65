//! Core configuration types and loading.

use super::defaults::*;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `token`.
pub const TOKEN_ENV: &str = "MPDCORD_TOKEN";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Discord bot token. May be left empty and supplied through
    /// [`TOKEN_ENV`] instead.
    #[serde(default)]
    pub token: String,
    /// Command prefix, e.g. `!`.
    pub prefix: String,
    /// Commands to register, keyed by handler name, in file order.
    #[serde(default)]
    pub commands: IndexMap<String, CommandConfig>,
    /// Music daemon connection.
    #[serde(default)]
    pub mpd: MpdConfig,
    /// Public base URLs for art and track downloads.
    pub download_servers: DownloadServers,
    /// Voice streaming.
    #[serde(default)]
    pub voice: VoiceConfig,
    /// Reaction selection behavior.
    #[serde(default)]
    pub selection: SelectionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Replace the token with `token` when it is set and non-empty.
    ///
    /// Callers pass `std::env::var(TOKEN_ENV).ok()`.
    pub fn override_token(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = token;
        }
    }
}

/// One `[commands.<name>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandConfig {
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// `[mpd]`
#[derive(Debug, Clone, Deserialize)]
pub struct MpdConfig {
    #[serde(default = "default_mpd_server")]
    pub server: String,
    #[serde(default = "default_mpd_port")]
    pub port: u16,
    /// Connect and request timeout in seconds.
    #[serde(default = "default_mpd_timeout")]
    pub timeout: u64,
    /// Maximum number of search results offered for selection.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    /// Album art lookup; without it embeds carry no thumbnail.
    pub art_grabber: Option<ArtGrabberConfig>,
}

impl Default for MpdConfig {
    fn default() -> Self {
        Self {
            server: default_mpd_server(),
            port: default_mpd_port(),
            timeout: default_mpd_timeout(),
            search_limit: default_search_limit(),
            art_grabber: None,
        }
    }
}

impl MpdConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// `[mpd.art_grabber]`
#[derive(Debug, Clone, Deserialize)]
pub struct ArtGrabberConfig {
    /// Directory served by the art download server.
    pub save_dir: PathBuf,
    /// Root of the MPD music library.
    pub library_dir: PathBuf,
    /// Enables Last.fm lookups when no local art exists.
    pub lastfm_api_key: Option<String>,
}

/// `[download_servers]`
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadServers {
    pub art_url: String,
    pub music_url: String,
}

/// `[voice]`
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// FIFO that MPD's `fifo` audio output writes to.
    #[serde(default = "default_fifo_path")]
    pub fifo_path: PathBuf,
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
    #[serde(default = "default_idle_grace_secs")]
    pub idle_grace_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            fifo_path: default_fifo_path(),
            ffmpeg_path: default_ffmpeg_path(),
            idle_grace_secs: default_idle_grace_secs(),
        }
    }
}

impl VoiceConfig {
    pub fn idle_grace(&self) -> Duration {
        Duration::from_secs(self.idle_grace_secs)
    }
}

/// `[selection]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionConfig {
    /// Abandon a selection after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,
    /// Let the user who ran the command pick a result.
    #[serde(default)]
    pub initiator_may_choose: bool,
}

impl SelectionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
