//! `search` and `add`: offer library matches for selection.

use crate::commands::{ActionRequest, CommandReply, Context, Handler, HandlerResult};
use crate::daemon::{MusicDaemon, SearchQuery};
use crate::error::HandlerError;
use crate::render::{Renderer, results_embed};
use crate::selection::{Continuation, SelectableItem};
use crate::transport::{ChatTransport, SentMessage};
use async_trait::async_trait;
use mpd_proto::Song;
use std::sync::Arc;
use tracing::{debug, info};

async fn run_search(ctx: &Context<'_>, args: &[String]) -> Result<Vec<Song>, HandlerError> {
    let query = SearchQuery::from_tokens(args);
    let mut songs = ctx.services.daemon.search(&query).await?;
    let found = songs.len();
    songs.truncate(ctx.services.search_limit);
    debug!(query = ?query.pairs(), found, shown = songs.len(), "search");
    Ok(songs)
}

fn selection_reply(songs: Vec<Song>, continuation: Arc<dyn Continuation>) -> CommandReply {
    let embed = results_embed(&songs, "Search Results", "No results.");
    CommandReply::embed(embed)
        .with_action(ActionRequest::AwaitReaction {
            items: SelectableItem::from_songs(songs),
        })
        .with_continuation(continuation)
}

pub struct SearchHandler;

#[async_trait]
impl Handler for SearchHandler {
    async fn handle(&self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        let songs = run_search(ctx, args).await?;
        let continuation = ShowSong {
            renderer: Arc::clone(&ctx.services.renderer),
        };
        Ok(selection_reply(songs, Arc::new(continuation)))
    }
}

pub struct AddHandler;

#[async_trait]
impl Handler for AddHandler {
    async fn handle(&self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        let songs = run_search(ctx, args).await?;
        let continuation = EnqueueSong {
            daemon: Arc::clone(&ctx.services.daemon),
            renderer: Arc::clone(&ctx.services.renderer),
        };
        Ok(selection_reply(songs, Arc::new(continuation)))
    }
}

/// Post the chosen song's detail embed.
pub struct ShowSong {
    pub renderer: Arc<Renderer>,
}

#[async_trait]
impl Continuation for ShowSong {
    async fn resume(
        &self,
        transport: &dyn ChatTransport,
        hosting: &SentMessage,
        item: SelectableItem,
    ) -> Result<(), HandlerError> {
        let embed = self.renderer.song_embed(&item.song, None).await;
        transport
            .send_message(hosting.channel_id, &embed.into())
            .await?;
        Ok(())
    }
}

/// Queue the chosen song, then post it with an "Added to queue." note.
pub struct EnqueueSong {
    pub daemon: Arc<dyn MusicDaemon>,
    pub renderer: Arc<Renderer>,
}

#[async_trait]
impl Continuation for EnqueueSong {
    async fn resume(
        &self,
        transport: &dyn ChatTransport,
        hosting: &SentMessage,
        item: SelectableItem,
    ) -> Result<(), HandlerError> {
        self.daemon.add(&item.song.file).await?;
        info!(file = %item.song.file, "added to queue");

        let embed = self
            .renderer
            .song_embed(&item.song, Some("Added to queue."))
            .await;
        transport
            .send_message(hosting.channel_id, &embed.into())
            .await?;
        Ok(())
    }
}
