//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::commands::handlers::KNOWN_COMMANDS;
use crate::selection::LabelAlphabet;
use thiserror::Error;

/// Largest search result count that can still be labelled for selection.
pub const MAX_SEARCH_LIMIT: usize = LabelAlphabet::LEN;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("token is required (set it in the config or via MPDCORD_TOKEN)")]
    MissingToken,
    #[error("prefix must be non-empty and contain no whitespace, got {0:?}")]
    InvalidPrefix(String),
    #[error("mpd.server is required")]
    MissingMpdServer,
    #[error("mpd.timeout must be greater than zero")]
    ZeroMpdTimeout,
    #[error("mpd.search_limit must be between 1 and {MAX_SEARCH_LIMIT}, got {0}")]
    SearchLimitOutOfRange(usize),
    #[error("download_servers.{field} must be an http(s) URL, got {value:?}")]
    InvalidDownloadUrl { field: &'static str, value: String },
    #[error("no commands configured")]
    NoCommands,
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("command {command:?} has an invalid alias {alias:?}")]
    InvalidAlias { command: String, alias: String },
    #[error("selection.timeout_secs must be greater than zero")]
    ZeroSelectionTimeout,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.token.trim().is_empty() {
        errors.push(ValidationError::MissingToken);
    }
    if config.prefix.is_empty() || config.prefix.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidPrefix(config.prefix.clone()));
    }

    // MPD
    if config.mpd.server.trim().is_empty() {
        errors.push(ValidationError::MissingMpdServer);
    }
    if config.mpd.timeout == 0 {
        errors.push(ValidationError::ZeroMpdTimeout);
    }
    if !(1..=MAX_SEARCH_LIMIT).contains(&config.mpd.search_limit) {
        errors.push(ValidationError::SearchLimitOutOfRange(
            config.mpd.search_limit,
        ));
    }

    // Download links
    for (field, value) in [
        ("art_url", &config.download_servers.art_url),
        ("music_url", &config.download_servers.music_url),
    ] {
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            errors.push(ValidationError::InvalidDownloadUrl {
                field,
                value: value.clone(),
            });
        }
    }

    // Commands
    if config.commands.is_empty() {
        errors.push(ValidationError::NoCommands);
    }
    for (name, command) in &config.commands {
        if !KNOWN_COMMANDS.contains(&name.as_str()) {
            errors.push(ValidationError::UnknownCommand(name.clone()));
        }
        for alias in &command.aliases {
            if alias.is_empty() || alias.chars().any(char::is_whitespace) {
                errors.push(ValidationError::InvalidAlias {
                    command: name.clone(),
                    alias: alias.clone(),
                });
            }
        }
    }

    if config.selection.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroSelectionTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extra: &str) -> Config {
        let base = r#"
            token = "abc"
            prefix = "!"

            [download_servers]
            art_url = "https://art/"
            music_url = "https://music/"

            [commands.search]
            aliases = ["s"]
        "#;
        toml::from_str(&format!("{base}\n{extra}")).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(validate(&config("")), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut cfg = config(
            r#"
            [commands.dance]
            [commands.playing]
            aliases = ["now playing"]
            "#,
        );
        cfg.token.clear();
        cfg.prefix = "! ".into();
        cfg.mpd.search_limit = 27;
        cfg.download_servers.music_url = "ftp://music/".into();

        let errors = validate(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingToken,
                ValidationError::InvalidPrefix("! ".into()),
                ValidationError::SearchLimitOutOfRange(27),
                ValidationError::InvalidDownloadUrl {
                    field: "music_url",
                    value: "ftp://music/".into(),
                },
                ValidationError::UnknownCommand("dance".into()),
                ValidationError::InvalidAlias {
                    command: "playing".into(),
                    alias: "now playing".into(),
                },
            ]
        );
    }

    #[test]
    fn search_limit_bounds() {
        let mut cfg = config("");
        cfg.mpd.search_limit = 26;
        assert!(validate(&cfg).is_ok());
        cfg.mpd.search_limit = 0;
        assert_eq!(
            validate(&cfg),
            Err(vec![ValidationError::SearchLimitOutOfRange(0)])
        );
    }

    #[test]
    fn zero_timeouts_rejected() {
        let mut cfg = config("[selection]\ntimeout_secs = 0");
        cfg.mpd.timeout = 0;
        assert_eq!(
            validate(&cfg),
            Err(vec![
                ValidationError::ZeroMpdTimeout,
                ValidationError::ZeroSelectionTimeout,
            ])
        );
    }
}
