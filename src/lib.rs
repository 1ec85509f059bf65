//! mpdcord - a Discord bridge for MPD.
//!
//! Chat commands search the daemon's library, queue songs through reaction
//! menus and stream the daemon's audio output into a voice channel.

pub mod art;
pub mod bot;
pub mod commands;
pub mod config;
pub mod daemon;
pub mod error;
pub mod render;
pub mod selection;
pub mod transport;
pub mod voice;
