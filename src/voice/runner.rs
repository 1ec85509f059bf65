use super::{VoiceChannel, VoiceGateway};
use crate::daemon::MusicDaemon;
use crate::transport::{ChatTransport, GuildId, SentMessage};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};

const ALREADY_IN_VOICE: &str = "Already in voice.";
const EMPTY_PLAYLIST: &str = "You cannot do that with an empty playlist.";
const NOT_CONNECTED: &str = "Playback cannot be toggled if I am not connected.";
const REQUEST_FAILED: &str = "Could not complete request.";

/// What a voice action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceOutcome {
    Joined,
    AlreadyConnected,
    Toggled { paused: bool },
    EmptyPlaylist,
    NotConnected,
    Left,
    Failed,
}

/// Executes voice actions and edits the message that announced them.
pub struct VoiceActionRunner {
    pub(super) gateway: Arc<dyn VoiceGateway>,
    transport: Arc<dyn ChatTransport>,
    daemon: Arc<dyn MusicDaemon>,
    pub(super) streaming: AtomicBool,
    pub(super) idle_grace: Duration,
}

impl VoiceActionRunner {
    pub fn new(
        gateway: Arc<dyn VoiceGateway>,
        transport: Arc<dyn ChatTransport>,
        daemon: Arc<dyn MusicDaemon>,
        idle_grace: Duration,
    ) -> Self {
        Self {
            gateway,
            transport,
            daemon,
            streaming: AtomicBool::new(false),
            idle_grace,
        }
    }

    /// Whether audio is currently being piped to a voice channel.
    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    async fn edit(&self, sent: &SentMessage, text: &str) {
        if let Err(e) = self.transport.edit_message(sent, text).await {
            warn!(message = %sent.id, error = %e, "failed to edit voice status message");
        }
    }

    /// Join `channel`, start streaming and resume playback.
    pub async fn join_voice(
        &self,
        guild: GuildId,
        channel: &VoiceChannel,
        sent: &SentMessage,
    ) -> VoiceOutcome {
        if self.gateway.connected_channel(guild).await.is_some() {
            self.edit(sent, ALREADY_IN_VOICE).await;
            return VoiceOutcome::AlreadyConnected;
        }

        if let Err(e) = self.gateway.connect(guild, channel.id).await {
            error!(guild = %guild, channel = %channel.id, error = %e, "voice join failed");
            self.edit(sent, &format!("Could not join **{}**.", channel.name))
                .await;
            return VoiceOutcome::Failed;
        }
        info!(guild = %guild, channel = %channel.name, "joined voice");

        self.streaming.store(true, Ordering::SeqCst);
        if let Err(e) = self.gateway.start_stream(guild).await {
            error!(guild = %guild, error = %e, "failed to start audio stream");
        }
        if let Err(e) = self.daemon.start_playback().await {
            warn!(error = %e, "could not start playback");
        }

        let joined = match &sent.content {
            Some(text) => text.replace("Joining", "Joined").replace("...", "."),
            None => format!("Joined **{}**.", channel.name),
        };
        self.edit(sent, &joined).await;
        VoiceOutcome::Joined
    }

    /// Flip the pause state, given whether the player was paused when the
    /// command ran.
    pub async fn toggle_playback(
        &self,
        guild: GuildId,
        currently_paused: bool,
        sent: &SentMessage,
    ) -> VoiceOutcome {
        if self.gateway.connected_channel(guild).await.is_none() {
            if let Err(e) = self.daemon.set_pause(true).await {
                warn!(error = %e, "could not pause while disconnected");
            }
            self.edit(sent, NOT_CONNECTED).await;
            return VoiceOutcome::NotConnected;
        }

        let playlist = match self.daemon.playlist().await {
            Ok(playlist) => playlist,
            Err(e) => {
                error!(error = %e, "could not read playlist");
                self.edit(sent, REQUEST_FAILED).await;
                return VoiceOutcome::Failed;
            }
        };
        if playlist.is_empty() {
            self.edit(sent, EMPTY_PLAYLIST).await;
            return VoiceOutcome::EmptyPlaylist;
        }

        let paused = !currently_paused;
        if let Err(e) = self.daemon.set_pause(paused).await {
            error!(error = %e, "could not toggle playback");
            self.edit(sent, REQUEST_FAILED).await;
            return VoiceOutcome::Failed;
        }
        self.edit(sent, if paused { "Paused." } else { "Unpaused." })
            .await;
        VoiceOutcome::Toggled { paused }
    }

    /// Disconnect and remove the announcing message. Does nothing when the
    /// bot is not in voice.
    pub async fn leave_voice(&self, guild: GuildId, sent: &SentMessage) -> VoiceOutcome {
        if self.gateway.connected_channel(guild).await.is_none() {
            return VoiceOutcome::NotConnected;
        }

        if let Err(e) = self.gateway.disconnect(guild).await {
            error!(guild = %guild, error = %e, "voice leave failed");
            self.edit(sent, "Could not leave voice.").await;
            return VoiceOutcome::Failed;
        }
        self.streaming.store(false, Ordering::SeqCst);
        info!(guild = %guild, "left voice");

        if let Err(e) = self.transport.delete_message(sent).await {
            warn!(message = %sent.id, error = %e, "failed to delete leave message");
        }
        VoiceOutcome::Left
    }
}
