//! Command handlers known to the binary.
//!
//! Configuration decides which of these are registered and under which
//! aliases.

mod help;
mod playback;
mod search;
mod voice;

pub use help::HelpHandler;
pub use playback::{PlayingHandler, PlaylistHandler};
pub use search::{AddHandler, EnqueueSong, SearchHandler, ShowSong};
pub use voice::{JoinHandler, LeaveHandler, NOT_IN_VOICE, PauseHandler};

use super::context::Handler;

/// Names accepted in `[commands.<name>]`.
pub const KNOWN_COMMANDS: &[&str] = &[
    "playing", "search", "add", "playlist", "join", "pause", "leave", "help",
];

/// Handler for a configured command name.
pub fn lookup(name: &str) -> Option<Box<dyn Handler>> {
    let handler: Box<dyn Handler> = match name {
        "playing" => Box::new(PlayingHandler),
        "search" => Box::new(SearchHandler),
        "add" => Box::new(AddHandler),
        "playlist" => Box::new(PlaylistHandler),
        "join" => Box::new(JoinHandler),
        "pause" => Box::new(PauseHandler),
        "leave" => Box::new(LeaveHandler),
        "help" => Box::new(HelpHandler),
        _ => return None,
    };
    Some(handler)
}
