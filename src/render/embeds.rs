use super::{DownloadLinks, Embed, colour};
use crate::art::ArtResolver;
use crate::selection::LabelAlphabet;
use mpd_proto::Song;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// Builds song embeds, resolving album art on the way.
pub struct Renderer {
    links: DownloadLinks,
    art: Arc<dyn ArtResolver>,
}

impl Renderer {
    pub fn new(links: DownloadLinks, art: Arc<dyn ArtResolver>) -> Self {
        Self { links, art }
    }

    pub fn links(&self) -> &DownloadLinks {
        &self.links
    }

    /// Detail embed for one song. `additional` is appended in bold below the
    /// album line.
    ///
    /// Art is looked up locally first, then remotely; when neither produces a
    /// file the embed simply has no thumbnail.
    pub async fn song_embed(&self, song: &Song, additional: Option<&str>) -> Embed {
        let mut description = format!("{} - {}", song.album(), song.artist());
        if let Some(extra) = additional {
            let _ = write!(description, "\n**{extra}**");
        }

        let mut embed = Embed::new(song.title(), description, colour::SONG);

        let art = match self.art.resolve_local(song).await {
            Some(path) => Some(path),
            None => self.art.resolve_remote(song).await,
        };
        match art {
            Some(path) => {
                debug!(file = %song.file, art = %path.display(), "album art resolved");
                embed = embed.thumbnail(self.links.art_url(song));
            }
            None => debug!(file = %song.file, "no album art"),
        }

        embed.field(
            "Download Link",
            format!("[Click Here]({})", self.links.track_url(song)),
        )
    }
}

/// Lettered list of songs; `empty` is shown when there are none.
pub fn results_embed(songs: &[Song], title: &str, empty: &str) -> Embed {
    if songs.is_empty() {
        return Embed::new(title, empty, colour::RESULTS);
    }

    let mut description = String::new();
    for (i, song) in songs.iter().enumerate() {
        let label = LabelAlphabet::letter(i).map_or_else(|| "?".to_string(), String::from);
        let _ = writeln!(
            description,
            "{label}: **{}** - **{}** by **{}**. ({})",
            song.title(),
            song.album(),
            song.artist(),
            format_duration(song.duration.unwrap_or_default()),
        );
    }
    Embed::new(title, description, colour::RESULTS)
}

/// `h:mm:ss`, rounded to the nearest second.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!(
        "{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::NoArt;
    use crate::config::DownloadServers;
    use async_trait::async_trait;
    use std::path::PathBuf;

    fn song(title: &str, seconds: f64) -> Song {
        Song {
            file: format!("Artist/Album/{title}.flac"),
            title: Some(title.into()),
            artist: Some("Artist".into()),
            album: Some("Album".into()),
            duration: Some(seconds),
            ..Song::default()
        }
    }

    fn links() -> DownloadLinks {
        DownloadLinks::new(&DownloadServers {
            art_url: "https://a/".into(),
            music_url: "https://m/".into(),
        })
    }

    struct RemoteOnly;

    #[async_trait]
    impl ArtResolver for RemoteOnly {
        async fn resolve_local(&self, _song: &Song) -> Option<PathBuf> {
            None
        }

        async fn resolve_remote(&self, _song: &Song) -> Option<PathBuf> {
            Some(PathBuf::from("/art/Artist - Album.jpg"))
        }
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0.0), "0:00:00");
        assert_eq!(format_duration(225.4), "0:03:45");
        assert_eq!(format_duration(3725.6), "1:02:06");
    }

    #[test]
    fn results_lines_are_lettered() {
        let embed = results_embed(
            &[song("One", 61.0), song("Two", 120.0)],
            "Search Results",
            "No results.",
        );
        assert_eq!(embed.colour, colour::RESULTS);
        assert_eq!(
            embed.description,
            "A: **One** - **Album** by **Artist**. (0:01:01)\n\
             B: **Two** - **Album** by **Artist**. (0:02:00)\n"
        );
    }

    #[test]
    fn empty_results_use_placeholder() {
        let embed = results_embed(&[], "Current Playlist", "Empty.");
        assert_eq!(embed.title, "Current Playlist");
        assert_eq!(embed.description, "Empty.");
    }

    #[tokio::test]
    async fn song_embed_without_art_has_no_thumbnail() {
        let renderer = Renderer::new(links(), Arc::new(NoArt));
        let embed = renderer.song_embed(&song("One", 1.0), Some("Added to queue.")).await;

        assert_eq!(embed.title, "One");
        assert_eq!(embed.description, "Album - Artist\n**Added to queue.**");
        assert_eq!(embed.thumbnail, None);
        assert_eq!(embed.fields[0].name, "Download Link");
        assert_eq!(
            embed.fields[0].value,
            "[Click Here](https://m/Artist/Album/One.flac)"
        );
    }

    #[tokio::test]
    async fn song_embed_falls_back_to_remote_art() {
        let renderer = Renderer::new(links(), Arc::new(RemoteOnly));
        let embed = renderer.song_embed(&song("One", 1.0), None).await;
        assert_eq!(
            embed.thumbnail.as_deref(),
            Some("https://a/Artist%20-%20Album.jpg")
        );
    }
}
