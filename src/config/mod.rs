//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and loading
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks, reporting every problem at once

pub mod defaults;
mod types;
mod validation;

pub use types::{
    ArtGrabberConfig, CommandConfig, Config, ConfigError, DownloadServers, MpdConfig,
    SelectionConfig, TOKEN_ENV, VoiceConfig,
};
pub use validation::{MAX_SEARCH_LIMIT, ValidationError, validate};
