//! `join`, `pause` and `leave`. All of them require the invoker to be in a
//! voice channel.

use crate::commands::{ActionRequest, CommandReply, Context, Handler, HandlerResult};
use async_trait::async_trait;

pub const NOT_IN_VOICE: &str = "You must be in a voice channel to do that.";

pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        let Some(channel) = ctx.invocation.author_voice.clone() else {
            return Ok(CommandReply::text(NOT_IN_VOICE));
        };
        Ok(
            CommandReply::text(format!("Joining **{}**...", channel.name))
                .with_action(ActionRequest::JoinVoice { channel }),
        )
    }
}

pub struct PauseHandler;

#[async_trait]
impl Handler for PauseHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        if ctx.invocation.author_voice.is_none() {
            return Ok(CommandReply::text(NOT_IN_VOICE));
        }
        let currently_paused = ctx.services.daemon.is_paused().await?;
        Ok(CommandReply::text("Toggling playback...")
            .with_action(ActionRequest::TogglePlayback { currently_paused }))
    }
}

pub struct LeaveHandler;

#[async_trait]
impl Handler for LeaveHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        if ctx.invocation.author_voice.is_none() {
            return Ok(CommandReply::text(NOT_IN_VOICE));
        }
        Ok(CommandReply::text("Leaving...").with_action(ActionRequest::LeaveVoice))
    }
}
