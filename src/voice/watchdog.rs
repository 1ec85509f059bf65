//! Idle disconnect.

use super::VoiceActionRunner;
use crate::transport::GuildId;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

impl VoiceActionRunner {
    /// React to a voice-state change in `guild`.
    ///
    /// When the bot is the only member left in its channel, a check is
    /// scheduled after the grace period. It disconnects only if the bot is
    /// still alone in that same channel, so a member rejoining in the meantime
    /// cancels it. The returned task yields whether it disconnected.
    pub async fn on_voice_state_change(self: &Arc<Self>, guild: GuildId) -> Option<JoinHandle<bool>> {
        let channel = self.gateway.connected_channel(guild).await?;
        if self.gateway.member_count(guild, channel) != 1 {
            return None;
        }
        debug!(guild = %guild, channel = %channel, grace = ?self.idle_grace, "alone in voice");

        let runner = Arc::clone(self);
        Some(tokio::spawn(async move {
            tokio::time::sleep(runner.idle_grace).await;

            if runner.gateway.connected_channel(guild).await != Some(channel)
                || runner.gateway.member_count(guild, channel) != 1
            {
                return false;
            }
            match runner.gateway.disconnect(guild).await {
                Ok(()) => {
                    runner.streaming.store(false, Ordering::SeqCst);
                    info!(guild = %guild, channel = %channel, "left idle voice channel");
                    true
                }
                Err(e) => {
                    warn!(guild = %guild, error = %e, "idle disconnect failed");
                    false
                }
            }
        }))
    }
}
