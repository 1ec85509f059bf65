//! Music daemon access.
//!
//! Handlers see the daemon only through [`MusicDaemon`]. The production
//! implementation is [`DaemonHandle`], a cheap cloneable front for the
//! [`DaemonActor`] task that owns the one MPD connection.

mod actor;
mod query;

pub use actor::{DaemonActor, DaemonHandle};
pub use query::{QUERY_TAGS, SearchQuery};

use async_trait::async_trait;
use mpd_proto::{AckError, PlayState, ProtocolError, Song, Status};
use thiserror::Error;

/// Daemon-level failures, as seen by handlers.
#[derive(Debug, Clone, Error)]
pub enum DaemonError {
    /// The daemon could not be reached, even after a reconnect.
    #[error("music daemon unavailable: {0}")]
    Unavailable(String),

    /// The daemon answered with `ACK`.
    #[error("music daemon rejected command: {0}")]
    Rejected(AckError),

    /// The daemon sent something we could not make sense of.
    #[error("music daemon protocol error: {0}")]
    Protocol(String),

    /// The actor task has stopped.
    #[error("daemon actor is gone")]
    ActorGone,
}

impl DaemonError {
    /// Whether the request failed because no usable connection exists.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

impl From<ProtocolError> for DaemonError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Ack(ack) => Self::Rejected(ack),
            ProtocolError::InvalidArgument(_)
            | ProtocolError::MalformedLine(_)
            | ProtocolError::InvalidUtf8 { .. }
            | ProtocolError::LineTooLong { .. } => Self::Protocol(err.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Operations the bot needs from the music daemon.
#[async_trait]
pub trait MusicDaemon: Send + Sync {
    /// The song at the current queue position, if any.
    async fn current_song(&self) -> Result<Option<Song>, DaemonError>;

    /// Library search.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Song>, DaemonError>;

    /// The queue.
    async fn playlist(&self) -> Result<Vec<Song>, DaemonError>;

    /// Append a library URI to the queue.
    async fn add(&self, uri: &str) -> Result<(), DaemonError>;

    async fn set_pause(&self, paused: bool) -> Result<(), DaemonError>;

    /// Start playing the queue at `position`.
    async fn play(&self, position: u32) -> Result<(), DaemonError>;

    async fn status(&self) -> Result<Status, DaemonError>;

    /// Resume a paused player, or start a stopped one when there is
    /// something queued.
    async fn start_playback(&self) -> Result<(), DaemonError> {
        let status = self.status().await?;
        match status.state {
            PlayState::Pause => self.set_pause(false).await,
            PlayState::Stop if status.playlist_length > 0 => self.play(0).await,
            _ => Ok(()),
        }
    }

    /// Anything but `play` counts as paused.
    async fn is_paused(&self) -> Result<bool, DaemonError> {
        Ok(self.status().await?.state != PlayState::Play)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Scripted {
        status: Status,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MusicDaemon for Scripted {
        async fn current_song(&self) -> Result<Option<Song>, DaemonError> {
            Ok(None)
        }
        async fn search(&self, _query: &SearchQuery) -> Result<Vec<Song>, DaemonError> {
            Ok(Vec::new())
        }
        async fn playlist(&self) -> Result<Vec<Song>, DaemonError> {
            Ok(Vec::new())
        }
        async fn add(&self, uri: &str) -> Result<(), DaemonError> {
            self.calls.lock().push(format!("add {uri}"));
            Ok(())
        }
        async fn set_pause(&self, paused: bool) -> Result<(), DaemonError> {
            self.calls.lock().push(format!("pause {}", u8::from(paused)));
            Ok(())
        }
        async fn play(&self, position: u32) -> Result<(), DaemonError> {
            self.calls.lock().push(format!("play {position}"));
            Ok(())
        }
        async fn status(&self) -> Result<Status, DaemonError> {
            Ok(self.status.clone())
        }
    }

    fn with_state(state: PlayState, playlist_length: u32) -> Scripted {
        Scripted {
            status: Status {
                state,
                playlist_length,
                ..Status::default()
            },
            ..Scripted::default()
        }
    }

    #[tokio::test]
    async fn start_playback_unpauses() {
        let daemon = with_state(PlayState::Pause, 3);
        daemon.start_playback().await.unwrap();
        assert_eq!(*daemon.calls.lock(), vec!["pause 0"]);
    }

    #[tokio::test]
    async fn start_playback_plays_stopped_queue() {
        let daemon = with_state(PlayState::Stop, 3);
        daemon.start_playback().await.unwrap();
        assert_eq!(*daemon.calls.lock(), vec!["play 0"]);
    }

    #[tokio::test]
    async fn start_playback_leaves_empty_queue_alone() {
        let daemon = with_state(PlayState::Stop, 0);
        daemon.start_playback().await.unwrap();
        assert!(daemon.calls.lock().is_empty());

        let playing = with_state(PlayState::Play, 3);
        playing.start_playback().await.unwrap();
        assert!(playing.calls.lock().is_empty());
        assert!(!playing.is_paused().await.unwrap());
    }

    #[test]
    fn protocol_errors_map_to_daemon_errors() {
        let closed: DaemonError = ProtocolError::ConnectionClosed.into();
        assert!(closed.is_unavailable());

        let ack = AckError::parse("[50@0] {add} No such directory").unwrap();
        let rejected: DaemonError = ProtocolError::Ack(ack).into();
        assert!(!rejected.is_unavailable());
    }
}
