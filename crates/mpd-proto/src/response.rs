//! Typed views over `key: value` responses.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A song record as returned by `currentsong`, `search` and `playlistinfo`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Song {
    /// Library-relative URI.
    pub file: String,
    /// `Title` tag.
    pub title: Option<String>,
    /// `Artist` tag.
    pub artist: Option<String>,
    /// `Album` tag.
    pub album: Option<String>,
    /// Duration in seconds (`duration`, falling back to the legacy `Time`).
    pub duration: Option<f64>,
    /// Every other key of the record, last value wins.
    pub tags: BTreeMap<String, String>,
}

impl Song {
    /// Split a flat pair list into songs. Each `file` key starts a new record.
    ///
    /// Pairs that appear before the first `file` key are ignored.
    pub fn list_from_pairs<I>(pairs: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut songs = Vec::new();
        let mut current: Option<Song> = None;

        for (key, value) in pairs {
            if key == "file" {
                if let Some(done) = current.take() {
                    songs.push(done);
                }
                current = Some(Song {
                    file: value,
                    ..Song::default()
                });
                continue;
            }
            if let Some(song) = current.as_mut() {
                song.apply(key, value);
            }
        }

        songs.extend(current);
        songs
    }

    /// Build a single song from a pair list; `None` when there is no `file` key
    /// (MPD answers `currentsong` with an empty response when nothing plays).
    pub fn from_pairs<I>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self::list_from_pairs(pairs).into_iter().next()
    }

    fn apply(&mut self, key: String, value: String) {
        match key.as_str() {
            "Title" => self.title = Some(value),
            "Artist" => self.artist = Some(value),
            "Album" => self.album = Some(value),
            "duration" => self.duration = value.parse().ok().or(self.duration),
            "Time" => {
                if self.duration.is_none() {
                    self.duration = value.parse().ok();
                }
            }
            _ => {
                self.tags.insert(key, value);
            }
        }
    }

    /// Title, or empty when untagged.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Artist, or empty when untagged.
    pub fn artist(&self) -> &str {
        self.artist.as_deref().unwrap_or_default()
    }

    /// Album, or empty when untagged.
    pub fn album(&self) -> &str {
        self.album.as_deref().unwrap_or_default()
    }

    /// Raw tag lookup.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Player state from `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Playing.
    Play,
    /// Paused.
    Pause,
    /// Stopped.
    #[default]
    Stop,
}

impl FromStr for PlayState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play" => Ok(Self::Play),
            "pause" => Ok(Self::Pause),
            "stop" => Ok(Self::Stop),
            other => Err(format!("unknown player state {other:?}")),
        }
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
        })
    }
}

/// Subset of the `status` response the bridge cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// Player state.
    pub state: PlayState,
    /// Number of entries in the queue.
    pub playlist_length: u32,
    /// Queue position of the current song.
    pub song: Option<u32>,
    /// Volume, absent when the output has no mixer.
    pub volume: Option<i32>,
}

impl Status {
    /// Build from a `status` pair list. Unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut status = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "state" => status.state = value.parse().unwrap_or_default(),
                "playlistlength" => status.playlist_length = value.parse().unwrap_or(0),
                "song" => status.song = value.parse().ok(),
                "volume" => status.volume = value.parse().ok().filter(|v: &i32| *v >= 0),
                _ => {}
            }
        }
        status
    }

    /// `true` unless the player is actively playing.
    pub fn is_paused(&self) -> bool {
        self.state != PlayState::Play
    }
}
