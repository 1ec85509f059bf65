//! Wiring between platform events and the core.
//!
//! The Discord event handler translates gateway events into the plain types
//! of [`crate::transport`] and calls into [`Bot`]; everything below works
//! against traits and can be driven by in-memory fakes.

use crate::art::ArtResolver;
use crate::commands::{DispatchOutcome, Dispatcher, Invocation, Services, build_registry};
use crate::config::Config;
use crate::daemon::MusicDaemon;
use crate::error::{DispatchError, RegistryError};
use crate::render::{DownloadLinks, Renderer};
use crate::selection::SelectionEngine;
use crate::transport::{ChatTransport, GuildId, MessageId, ReactionEvent, UserId};
use crate::voice::{VoiceActionRunner, VoiceGateway};
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// External collaborators the bot is built from.
pub struct Collaborators {
    pub transport: Arc<dyn ChatTransport>,
    pub voice: Arc<dyn VoiceGateway>,
    pub daemon: Arc<dyn MusicDaemon>,
    pub art: Arc<dyn ArtResolver>,
}

pub struct Bot {
    dispatcher: Dispatcher,
    selection: Arc<SelectionEngine>,
    voice: Arc<VoiceActionRunner>,
    bot_user: OnceLock<UserId>,
}

impl Bot {
    /// Assemble the command table and the runtime pieces.
    pub fn new(config: &Config, parts: Collaborators) -> Result<Self, RegistryError> {
        let registry = build_registry(config)?;
        info!(commands = registry.len(), prefix = %config.prefix, "command table built");

        let renderer = Arc::new(Renderer::new(
            DownloadLinks::new(&config.download_servers),
            parts.art,
        ));
        let services = Services {
            daemon: Arc::clone(&parts.daemon),
            renderer,
            search_limit: config.mpd.search_limit,
        };

        let selection = Arc::new(SelectionEngine::new(
            Arc::clone(&parts.transport),
            &config.selection,
        ));
        let voice = Arc::new(VoiceActionRunner::new(
            parts.voice,
            Arc::clone(&parts.transport),
            parts.daemon,
            config.voice.idle_grace(),
        ));

        let dispatcher = Dispatcher::new(
            config.prefix.clone(),
            registry,
            services,
            parts.transport,
            Arc::clone(&selection),
            Arc::clone(&voice),
        );

        Ok(Self {
            dispatcher,
            selection,
            voice,
            bot_user: OnceLock::new(),
        })
    }

    /// Remember the bot's own account so its reactions and messages are
    /// skipped. Only the first call has an effect.
    pub fn set_bot_user(&self, id: UserId) {
        if self.bot_user.set(id).is_err() {
            debug!(user = %id, "bot user already known");
        }
    }

    fn is_self(&self, user: UserId) -> bool {
        self.bot_user.get() == Some(&user)
    }

    pub fn selection(&self) -> &Arc<SelectionEngine> {
        &self.selection
    }

    pub fn voice(&self) -> &Arc<VoiceActionRunner> {
        &self.voice
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn on_message(&self, invocation: Invocation) -> Option<DispatchOutcome> {
        if self.is_self(invocation.author) {
            return None;
        }
        match self.dispatcher.dispatch(&invocation).await {
            Ok(outcome) => outcome,
            Err(DispatchError::Send { command, source }) => {
                warn!(command = %command, error = %source, "reply could not be sent");
                None
            }
            // Already logged inside the command span.
            Err(DispatchError::Handler { .. }) => None,
        }
    }

    /// Route a reaction to the selection waiting on its message, if any.
    pub async fn on_reaction(&self, event: ReactionEvent) -> bool {
        if self.is_self(event.user_id) {
            return false;
        }
        self.selection.route(event).await
    }

    pub fn on_message_deleted(&self, message_id: MessageId) {
        if self.selection.forget(message_id) {
            debug!(message = %message_id, "selection message deleted");
        }
    }

    pub async fn on_voice_state_change(&self, guild: GuildId) -> Option<JoinHandle<bool>> {
        self.voice.on_voice_state_change(guild).await
    }
}
