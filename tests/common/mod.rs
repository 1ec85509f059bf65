//! Integration test common infrastructure.
//!
//! In-memory stand-ins for the chat platform, the music daemon and the voice
//! connection, plus a config builder. Every fake records what was asked of it
//! so tests can assert on the exact sequence of effects.

#![allow(dead_code)]

use async_trait::async_trait;
use mpd_proto::{AckError, PlayState, Song, Status};
use mpdcord::bot::{Bot, Collaborators};
use mpdcord::art::NoArt;
use mpdcord::commands::Invocation;
use mpdcord::config::Config;
use mpdcord::daemon::{DaemonError, MusicDaemon, SearchQuery};
use mpdcord::error::{TransportError, VoiceError};
use mpdcord::render::RenderSpec;
use mpdcord::transport::{
    ChannelId, ChatTransport, GuildId, MessageId, SentMessage, UserId,
};
use mpdcord::voice::{VoiceChannel, VoiceGateway};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

pub const BOT: UserId = UserId(1);
pub const ALICE: UserId = UserId(100);
pub const BOB: UserId = UserId(200);
pub const TEXT: ChannelId = ChannelId(10);
pub const GUILD: GuildId = GuildId(7);
pub const LOUNGE: ChannelId = ChannelId(20);

pub const CONFIG: &str = r#"
    token = "test-token"
    prefix = "!"

    [commands.playing]
    aliases = ["np"]
    description = "Show the current song."

    [commands.search]
    aliases = ["s"]
    description = "Search the library."

    [commands.add]
    aliases = ["a"]
    description = "Search and queue a song."

    [commands.playlist]
    aliases = ["pl"]
    description = "Show the queue."

    [commands.join]
    description = "Join your voice channel."

    [commands.pause]
    aliases = ["p"]
    description = "Toggle playback."

    [commands.leave]
    description = "Leave voice."

    [commands.help]
    aliases = ["h"]
    description = "List commands."

    [mpd]
    search_limit = 5

    [download_servers]
    art_url = "https://art.example/covers/"
    music_url = "https://music.example/library/"

    [voice]
    idle_grace_secs = 10
"#;

pub fn config() -> Config {
    toml::from_str(CONFIG).expect("test config parses")
}

pub fn song(file: &str, title: &str, artist: &str, album: &str) -> Song {
    Song {
        file: file.to_string(),
        title: Some(title.to_string()),
        artist: Some(artist.to_string()),
        album: Some(album.to_string()),
        duration: Some(185.0),
        ..Song::default()
    }
}

pub fn library() -> Vec<Song> {
    vec![
        song("beatles/abbey/01.flac", "Come Together", "The Beatles", "Abbey Road"),
        song("beatles/abbey/02.flac", "Something", "The Beatles", "Abbey Road"),
        song("beatles/help/01.flac", "Help!", "The Beatles", "Help!"),
    ]
}

// ============================================================================
// Chat transport
// ============================================================================

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send { channel: ChannelId, body: RenderSpec },
    Edit { message: MessageId, text: String },
    Delete { message: MessageId },
    React { message: MessageId, symbol: String },
    Unreact { message: MessageId, symbol: String, user: Option<UserId> },
}

#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU64,
    refused_symbols: Mutex<HashSet<String>>,
    refuse_sends: AtomicBool,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(1000),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Bodies of every message sent, in order.
    pub fn sent(&self) -> Vec<RenderSpec> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Send { body, .. } => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    /// Symbols the bot reacted with on `message`, in order.
    pub fn reactions_on(&self, message: MessageId) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::React { message: m, symbol } if *m == message => Some(symbol.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn edits_of(&self, message: MessageId) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Edit { message: m, text } if *m == message => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Make `add_reaction` fail for `symbol`.
    pub fn refuse_symbol(&self, symbol: &str) {
        self.refused_symbols.lock().insert(symbol.to_string());
    }

    pub fn refuse_sends(&self, refuse: bool) {
        self.refuse_sends.store(refuse, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn send_message(
        &self,
        channel: ChannelId,
        body: &RenderSpec,
    ) -> Result<SentMessage, TransportError> {
        if self.refuse_sends.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected("sends refused".into()));
        }
        self.record(Call::Send {
            channel,
            body: body.clone(),
        });
        Ok(SentMessage {
            channel_id: channel,
            id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            content: body.text().map(String::from),
        })
    }

    async fn edit_message(&self, message: &SentMessage, text: &str) -> Result<(), TransportError> {
        self.record(Call::Edit {
            message: message.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, message: &SentMessage) -> Result<(), TransportError> {
        self.record(Call::Delete {
            message: message.id,
        });
        Ok(())
    }

    async fn add_reaction(&self, message: &SentMessage, symbol: &str) -> Result<(), TransportError> {
        if self.refused_symbols.lock().contains(symbol) {
            return Err(TransportError::Rejected(format!("cannot react with {symbol}")));
        }
        self.record(Call::React {
            message: message.id,
            symbol: symbol.to_string(),
        });
        Ok(())
    }

    async fn remove_reaction(
        &self,
        message: &SentMessage,
        symbol: &str,
        user: Option<UserId>,
    ) -> Result<(), TransportError> {
        self.record(Call::Unreact {
            message: message.id,
            symbol: symbol.to_string(),
            user,
        });
        Ok(())
    }
}

// ============================================================================
// Music daemon
// ============================================================================

pub struct FakeDaemon {
    pub library: Vec<Song>,
    pub queue: Mutex<Vec<Song>>,
    pub state: Mutex<PlayState>,
    pub unavailable: AtomicBool,
    /// Answer every request with an `ACK`.
    pub rejecting: AtomicBool,
    pub requests: Mutex<Vec<String>>,
}

impl FakeDaemon {
    pub fn new(library: Vec<Song>) -> Arc<Self> {
        Arc::new(Self {
            library,
            queue: Mutex::new(Vec::new()),
            state: Mutex::new(PlayState::Stop),
            unavailable: AtomicBool::new(false),
            rejecting: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    fn check(&self, request: String) -> Result<(), DaemonError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DaemonError::Unavailable("connection refused".into()));
        }
        if self.rejecting.load(Ordering::SeqCst) {
            let ack = AckError::parse("[50@0] {search} rejected").expect("valid ack line");
            return Err(DaemonError::Rejected(ack));
        }
        self.requests.lock().push(request);
        Ok(())
    }
}

#[async_trait]
impl MusicDaemon for FakeDaemon {
    async fn current_song(&self) -> Result<Option<Song>, DaemonError> {
        self.check("currentsong".into())?;
        Ok(self.queue.lock().first().cloned())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Song>, DaemonError> {
        self.check(format!("search {:?}", query.pairs()))?;
        let matches = self
            .library
            .iter()
            .filter(|song| {
                query.pairs().iter().all(|(tag, value)| {
                    let value = value.to_lowercase();
                    let fields = match tag.as_str() {
                        "title" => vec![song.title()],
                        "artist" => vec![song.artist()],
                        "album" => vec![song.album()],
                        _ => vec![song.title(), song.artist(), song.album(), &song.file],
                    };
                    fields.iter().any(|f| f.to_lowercase().contains(&value))
                })
            })
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn playlist(&self) -> Result<Vec<Song>, DaemonError> {
        self.check("playlistinfo".into())?;
        Ok(self.queue.lock().clone())
    }

    async fn add(&self, uri: &str) -> Result<(), DaemonError> {
        self.check(format!("add {uri}"))?;
        if let Some(song) = self.library.iter().find(|s| s.file == uri) {
            self.queue.lock().push(song.clone());
        }
        Ok(())
    }

    async fn set_pause(&self, paused: bool) -> Result<(), DaemonError> {
        self.check(format!("pause {}", u8::from(paused)))?;
        let mut state = self.state.lock();
        if *state != PlayState::Stop {
            *state = if paused { PlayState::Pause } else { PlayState::Play };
        }
        Ok(())
    }

    async fn play(&self, position: u32) -> Result<(), DaemonError> {
        self.check(format!("play {position}"))?;
        *self.state.lock() = PlayState::Play;
        Ok(())
    }

    async fn status(&self) -> Result<Status, DaemonError> {
        self.check("status".into())?;
        Ok(Status {
            state: *self.state.lock(),
            playlist_length: self.queue.lock().len() as u32,
            ..Status::default()
        })
    }
}

// ============================================================================
// Voice
// ============================================================================

#[derive(Default)]
pub struct FakeVoice {
    connected: Mutex<HashMap<GuildId, ChannelId>>,
    members: Mutex<HashMap<ChannelId, usize>>,
    pub events: Mutex<Vec<String>>,
    pub refuse_join: AtomicBool,
}

impl FakeVoice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Set how many members (the bot included) sit in `channel`.
    pub fn set_members(&self, channel: ChannelId, count: usize) {
        self.members.lock().insert(channel, count);
    }

    pub fn is_connected(&self, guild: GuildId) -> bool {
        self.connected.lock().contains_key(&guild)
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl VoiceGateway for FakeVoice {
    async fn connected_channel(&self, guild: GuildId) -> Option<ChannelId> {
        self.connected.lock().get(&guild).copied()
    }

    async fn connect(&self, guild: GuildId, channel: ChannelId) -> Result<(), VoiceError> {
        if self.refuse_join.load(Ordering::SeqCst) {
            return Err(VoiceError::Join("missing permissions".into()));
        }
        self.connected.lock().insert(guild, channel);
        self.events.lock().push(format!("connect {channel}"));
        Ok(())
    }

    async fn start_stream(&self, guild: GuildId) -> Result<(), VoiceError> {
        self.events.lock().push(format!("stream {guild}"));
        Ok(())
    }

    async fn disconnect(&self, guild: GuildId) -> Result<(), VoiceError> {
        self.connected.lock().remove(&guild);
        self.events.lock().push(format!("disconnect {guild}"));
        Ok(())
    }

    fn member_count(&self, _guild: GuildId, channel: ChannelId) -> usize {
        self.members.lock().get(&channel).copied().unwrap_or(0)
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A bot wired to fakes.
pub struct Harness {
    pub bot: Arc<Bot>,
    pub transport: Arc<FakeTransport>,
    pub daemon: Arc<FakeDaemon>,
    pub voice: Arc<FakeVoice>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(config())
    }

    pub fn with_config(config: Config) -> Self {
        let transport = FakeTransport::new();
        let daemon = FakeDaemon::new(library());
        let voice = FakeVoice::new();
        let bot = Bot::new(
            &config,
            Collaborators {
                transport: Arc::clone(&transport) as _,
                voice: Arc::clone(&voice) as _,
                daemon: Arc::clone(&daemon) as _,
                art: Arc::new(NoArt),
            },
        )
        .expect("registry builds");
        bot.set_bot_user(BOT);
        Self {
            bot: Arc::new(bot),
            transport,
            daemon,
            voice,
        }
    }
}

/// A message from `author` in the text channel.
pub fn say(author: UserId, content: &str) -> Invocation {
    Invocation {
        channel_id: TEXT,
        guild_id: Some(GUILD),
        author,
        author_voice: None,
        content: content.to_string(),
    }
}

/// Same as [`say`], from someone sitting in the lounge voice channel.
pub fn say_in_voice(author: UserId, content: &str) -> Invocation {
    Invocation {
        author_voice: Some(VoiceChannel {
            id: LOUNGE,
            name: "Lounge".into(),
        }),
        ..say(author, content)
    }
}

/// Let spawned tasks run until they block.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

pub const TICK: Duration = Duration::from_millis(1);
