//! Handler context and core types.
//!
//! Handlers are pure with respect to the chat platform: they receive a
//! [`Context`] and return a [`CommandReply`] describing what to show and what
//! should happen next. The dispatcher performs the sends and side effects.

use super::registry::AliasRegistry;
use crate::daemon::MusicDaemon;
use crate::error::HandlerError;
use crate::render::{Embed, RenderSpec, Renderer};
use crate::selection::{Continuation, SelectableItem};
use crate::transport::{ChannelId, GuildId, UserId};
use crate::voice::VoiceChannel;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A chat message that may contain a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub channel_id: ChannelId,
    /// `None` in direct messages.
    pub guild_id: Option<GuildId>,
    pub author: UserId,
    /// Voice channel the author is in when the message arrived.
    pub author_voice: Option<VoiceChannel>,
    pub content: String,
}

/// Long-lived collaborators shared by all handlers.
pub struct Services {
    pub daemon: Arc<dyn MusicDaemon>,
    pub renderer: Arc<Renderer>,
    /// Cap on search results offered for selection.
    pub search_limit: usize,
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    pub invocation: &'a Invocation,
    pub services: &'a Services,
    /// Registered commands, for `help`.
    pub registry: &'a AliasRegistry,
}

/// Side effect to run after the reply has been sent.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    /// Offer `items` for selection on the sent message.
    AwaitReaction { items: Vec<SelectableItem> },
    JoinVoice { channel: VoiceChannel },
    TogglePlayback { currently_paused: bool },
    LeaveVoice,
}

/// What a handler produced.
pub struct CommandReply {
    pub render: RenderSpec,
    pub action: Option<ActionRequest>,
    /// Run with the chosen item once an `AwaitReaction` selection resolves.
    pub continuation: Option<Arc<dyn Continuation>>,
}

impl CommandReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(RenderSpec::PlainText(text.into()))
    }

    pub fn embed(embed: Embed) -> Self {
        Self::new(RenderSpec::Embed(embed))
    }

    fn new(render: RenderSpec) -> Self {
        Self {
            render,
            action: None,
            continuation: None,
        }
    }

    pub fn with_action(mut self, action: ActionRequest) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_continuation(mut self, continuation: Arc<dyn Continuation>) -> Self {
        self.continuation = Some(continuation);
        self
    }
}

impl fmt::Debug for CommandReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandReply")
            .field("render", &self.render)
            .field("action", &self.action)
            .field("continuation", &self.continuation.is_some())
            .finish()
    }
}

pub type HandlerResult = Result<CommandReply, HandlerError>;

/// Command handler.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Run the command with its whitespace-split arguments.
    async fn handle(&self, ctx: &Context<'_>, args: &[String]) -> HandlerResult;
}
