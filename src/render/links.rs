//! Public download URLs for songs and their cover art.

use crate::config::DownloadServers;
use mpd_proto::Song;

/// Builds links to the HTTP servers that expose the music library and the
/// art save directory.
#[derive(Debug, Clone)]
pub struct DownloadLinks {
    art_base: String,
    music_base: String,
}

impl DownloadLinks {
    pub fn new(servers: &DownloadServers) -> Self {
        Self {
            art_base: servers.art_url.clone(),
            music_base: servers.music_url.clone(),
        }
    }

    /// File name the art grabber saves a song's cover under.
    ///
    /// Path separators in the tags become `_`, so the name is always a
    /// single component of the save directory.
    pub fn art_file_name(song: &Song) -> String {
        format!(
            "{} - {}.jpg",
            flatten(song.artist()),
            flatten(song.album())
        )
    }

    pub fn art_url(&self, song: &Song) -> String {
        format!(
            "{}{}",
            self.art_base,
            urlencoding::encode(&Self::art_file_name(song))
        )
    }

    pub fn track_url(&self, song: &Song) -> String {
        format!("{}{}", self.music_base, encode_path(&song.file))
    }
}

fn flatten(tag: &str) -> String {
    tag.replace(['/', '\\'], "_")
}

/// Percent-encode a library path, keeping `/` separators intact.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> DownloadLinks {
        DownloadLinks::new(&DownloadServers {
            art_url: "https://art.example/".into(),
            music_url: "https://music.example/".into(),
        })
    }

    fn song() -> Song {
        Song {
            file: "The Beatles/Abbey Road/01 Come Together.flac".into(),
            artist: Some("The Beatles".into()),
            album: Some("Abbey Road".into()),
            ..Song::default()
        }
    }

    #[test]
    fn art_url_encodes_name() {
        assert_eq!(
            links().art_url(&song()),
            "https://art.example/The%20Beatles%20-%20Abbey%20Road.jpg"
        );
    }

    #[test]
    fn art_name_is_a_single_component() {
        let song = Song {
            artist: Some("AC/DC".into()),
            album: Some("..\\Back in Black".into()),
            ..Song::default()
        };
        let name = DownloadLinks::art_file_name(&song);
        assert_eq!(name, "AC_DC - .._Back in Black.jpg");
        assert_eq!(
            links().art_url(&song),
            "https://art.example/AC_DC%20-%20.._Back%20in%20Black.jpg"
        );
    }

    #[test]
    fn track_url_keeps_separators() {
        assert_eq!(
            links().track_url(&song()),
            "https://music.example/The%20Beatles/Abbey%20Road/01%20Come%20Together.flac"
        );
    }
}
