//! Default value functions for configuration.

use std::path::PathBuf;

// =============================================================================
// MPD Defaults
// =============================================================================

pub fn default_mpd_server() -> String {
    "localhost".to_string()
}

pub fn default_mpd_port() -> u16 {
    mpd_proto::DEFAULT_PORT
}

/// Connect and request timeout, in seconds.
pub fn default_mpd_timeout() -> u64 {
    10
}

pub fn default_search_limit() -> usize {
    20
}

// =============================================================================
// Voice Defaults
// =============================================================================

pub fn default_fifo_path() -> PathBuf {
    PathBuf::from("/tmp/mpd.fifo")
}

pub fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

/// How long the bot may sit alone in a voice channel, in seconds.
pub fn default_idle_grace_secs() -> u64 {
    10
}
