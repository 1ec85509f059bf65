//! # mpd-proto
//!
//! A small library for speaking the MPD (Music Player Daemon) text protocol.
//!
//! ## Features
//!
//! - Request construction with argument quoting ([`Request`])
//! - Response framing: `key: value` pairs terminated by `OK` or `ACK` ([`Frame`])
//! - Typed views over responses ([`Song`], [`Status`])
//! - Optional Tokio integration: a line codec and an async client
//!
//! ## Quick Start
//!
//! ```rust
//! use mpd_proto::Request;
//!
//! let search = Request::new("search").arg("album").arg("Abbey Road");
//! assert_eq!(search.to_line().unwrap(), "search \"album\" \"Abbey Road\"\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod frame;
pub mod request;
pub mod response;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
pub mod codec;

pub use error::{AckError, ProtocolError, Result};
pub use frame::Frame;
pub use request::Request;
pub use response::{PlayState, Song, Status};

#[cfg(feature = "tokio")]
pub use client::MpdClient;
#[cfg(feature = "tokio")]
pub use codec::MpdCodec;

/// Default MPD TCP port.
pub const DEFAULT_PORT: u16 = 6600;
