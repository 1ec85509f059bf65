//! Reaction-driven selection.
//!
//! A command that offers a list of results hands it to the
//! [`SelectionEngine`], which labels the hosting message with one reaction
//! per item and waits for someone to pick one. The pick runs a
//! [`Continuation`] with the chosen item.

mod alphabet;
mod engine;
mod session;

pub use alphabet::LabelAlphabet;
pub use engine::{SelectionEngine, SessionHandle, SessionOutcome};
pub use session::{Session, SessionState, Verdict};

use crate::error::HandlerError;
use crate::transport::{ChatTransport, SentMessage};
use async_trait::async_trait;
use mpd_proto::Song;

/// One choosable entry: a song and its position in the offered list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectableItem {
    pub position: usize,
    pub song: Song,
}

impl SelectableItem {
    /// Number a list of songs.
    pub fn from_songs(songs: impl IntoIterator<Item = Song>) -> Vec<Self> {
        songs
            .into_iter()
            .enumerate()
            .map(|(position, song)| Self { position, song })
            .collect()
    }
}

/// Deferred work run once a selection is confirmed.
#[async_trait]
pub trait Continuation: Send + Sync {
    /// `hosting` is the (already deleted) message the choice was made on.
    async fn resume(
        &self,
        transport: &dyn ChatTransport,
        hosting: &SentMessage,
        item: SelectableItem,
    ) -> Result<(), HandlerError>;
}
