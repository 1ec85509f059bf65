//! Album art lookup.
//!
//! Song embeds link to `{artist} - {album}.jpg` on the art download server.
//! An [`ArtResolver`] makes sure that file exists in the served directory,
//! first from the song's own folder and then from a remote search.

mod grabber;
mod lastfm;

pub use grabber::{Grabber, sanitize};
pub use lastfm::LastFm;

use async_trait::async_trait;
use mpd_proto::Song;
use std::path::PathBuf;
use thiserror::Error;

/// Art lookup failures. These never reach users; the embed just loses its
/// thumbnail.
#[derive(Debug, Error)]
pub enum ArtError {
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Resolves album art for a song into the served art directory.
#[async_trait]
pub trait ArtResolver: Send + Sync {
    /// Use an image next to the song in the music library.
    async fn resolve_local(&self, song: &Song) -> Option<PathBuf>;

    /// Use a cached download, or search for one.
    async fn resolve_remote(&self, song: &Song) -> Option<PathBuf>;
}

/// Resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArt;

#[async_trait]
impl ArtResolver for NoArt {
    async fn resolve_local(&self, _song: &Song) -> Option<PathBuf> {
        None
    }

    async fn resolve_remote(&self, _song: &Song) -> Option<PathBuf> {
        None
    }
}
