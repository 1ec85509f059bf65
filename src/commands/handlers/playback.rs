//! `playing` and `playlist`.

use crate::commands::{CommandReply, Context, Handler, HandlerResult};
use crate::render::{Embed, colour, results_embed};
use async_trait::async_trait;

pub struct PlayingHandler;

#[async_trait]
impl Handler for PlayingHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        match ctx.services.daemon.current_song().await? {
            Some(song) => Ok(CommandReply::embed(
                ctx.services.renderer.song_embed(&song, None).await,
            )),
            None => Ok(CommandReply::embed(Embed::new(
                "Nothing playing.",
                "",
                colour::NOTHING_PLAYING,
            ))),
        }
    }
}

pub struct PlaylistHandler;

#[async_trait]
impl Handler for PlaylistHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        let songs = ctx.services.daemon.playlist().await?;
        Ok(CommandReply::embed(results_embed(
            &songs,
            "Current Playlist",
            "Empty.",
        )))
    }
}
