//! Command dispatch: parse, resolve, run, send, then start follow-up actions.

use super::context::{ActionRequest, CommandReply, Context, Invocation, Services};
use super::registry::AliasRegistry;
use crate::error::DispatchError;
use crate::render::RenderSpec;
use crate::selection::{Continuation, SelectionEngine, SessionHandle};
use crate::transport::{ChatTransport, SentMessage};
use crate::voice::{VoiceActionRunner, VoiceOutcome};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info_span, warn};

/// Split `raw` into a command token and its arguments.
///
/// Returns `None` when `raw` does not start with `prefix` or no token follows
/// it. The token ends at the first whitespace; the rest is split on
/// whitespace.
pub fn parse_command_line<'a>(prefix: &str, raw: &'a str) -> Option<(&'a str, Vec<String>)> {
    let rest = raw.strip_prefix(prefix)?;
    let (token, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if token.is_empty() {
        return None;
    }
    Some((token, tail.split_whitespace().map(String::from).collect()))
}

/// A follow-up action that was started.
#[derive(Debug)]
pub enum RoutedAction {
    /// A selection session is running on the sent message.
    Selection(SessionHandle),
    /// A voice action ran to completion.
    Voice(VoiceOutcome),
}

/// Result of handling a recognised command.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Canonical command name.
    pub command: String,
    pub message: SentMessage,
    pub action: Option<RoutedAction>,
}

pub struct Dispatcher {
    prefix: String,
    registry: AliasRegistry,
    services: Services,
    transport: Arc<dyn ChatTransport>,
    selection: Arc<SelectionEngine>,
    voice: Arc<VoiceActionRunner>,
}

impl Dispatcher {
    pub fn new(
        prefix: impl Into<String>,
        registry: AliasRegistry,
        services: Services,
        transport: Arc<dyn ChatTransport>,
        selection: Arc<SelectionEngine>,
        voice: Arc<VoiceActionRunner>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            registry,
            services,
            transport,
            selection,
            voice,
        }
    }

    pub fn registry(&self) -> &AliasRegistry {
        &self.registry
    }

    /// Handle one chat message.
    ///
    /// `Ok(None)` means the message was not a known command. A handler
    /// failure sends nothing (except the notice for an unreachable daemon)
    /// and starts no action. The reply is always sent before the action
    /// starts.
    pub async fn dispatch(
        &self,
        invocation: &Invocation,
    ) -> Result<Option<DispatchOutcome>, DispatchError> {
        let Some((token, args)) = parse_command_line(&self.prefix, &invocation.content) else {
            return Ok(None);
        };
        let Some(descriptor) = self.registry.resolve(token) else {
            debug!(token, "unknown command");
            return Ok(None);
        };

        let span = info_span!(
            "command",
            command = descriptor.name(),
            channel = %invocation.channel_id,
            author = %invocation.author,
        );

        async {
            let command = descriptor.name().to_string();
            let ctx = Context {
                invocation,
                services: &self.services,
                registry: &self.registry,
            };

            let reply = match descriptor.run(&ctx, &args).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(error = %e, code = e.error_code(), "command failed");
                    if let Some(notice) = e.user_notice() {
                        let body = RenderSpec::PlainText(notice.to_string());
                        if let Err(send_err) =
                            self.transport.send_message(invocation.channel_id, &body).await
                        {
                            warn!(error = %send_err, "failed to send failure notice");
                        }
                    }
                    return Err(DispatchError::Handler { command, source: e });
                }
            };

            let CommandReply {
                render,
                action,
                continuation,
            } = reply;

            let message = self
                .transport
                .send_message(invocation.channel_id, &render)
                .await
                .map_err(|source| DispatchError::Send {
                    command: command.clone(),
                    source,
                })?;
            debug!(message = %message.id, "reply sent");

            let action = match action {
                Some(action) => {
                    self.route(action, continuation, &message, invocation)
                        .await
                }
                None => None,
            };

            Ok(Some(DispatchOutcome {
                command,
                message,
                action,
            }))
        }
        .instrument(span)
        .await
    }

    async fn route(
        &self,
        action: ActionRequest,
        continuation: Option<Arc<dyn Continuation>>,
        message: &SentMessage,
        invocation: &Invocation,
    ) -> Option<RoutedAction> {
        if let ActionRequest::AwaitReaction { items } = action {
            let Some(continuation) = continuation else {
                warn!("selection requested without a continuation");
                return None;
            };
            let handle =
                self.selection
                    .start(message.clone(), invocation.author, items, continuation);
            return Some(RoutedAction::Selection(handle));
        }

        let Some(guild) = invocation.guild_id else {
            warn!("voice action outside a guild");
            return None;
        };
        let outcome = match action {
            ActionRequest::JoinVoice { channel } => {
                self.voice.join_voice(guild, &channel, message).await
            }
            ActionRequest::TogglePlayback { currently_paused } => {
                self.voice
                    .toggle_playback(guild, currently_paused, message)
                    .await
            }
            ActionRequest::LeaveVoice => self.voice.leave_voice(guild, message).await,
            ActionRequest::AwaitReaction { .. } => return None,
        };
        Some(RoutedAction::Voice(outcome))
    }
}
