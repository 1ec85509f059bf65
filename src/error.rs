//! Unified error handling for mpdcord.
//!
//! Each layer owns an error enum; the dispatcher decides which of them are
//! surfaced to the user and which are only logged.

use thiserror::Error;

pub use crate::config::{ConfigError, ValidationError};
pub use crate::daemon::DaemonError;

// ============================================================================
// Registry Errors (startup)
// ============================================================================

/// Errors raised while building the command table. All of them are fatal:
/// they mean the configuration names something inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a command named {0:?} is already registered")]
    DuplicateCommand(String),

    #[error("alias {alias:?} of {command:?} is already taken by {owner:?}")]
    DuplicateAlias {
        alias: String,
        command: String,
        owner: String,
    },

    #[error("no handler exists for configured command {0:?}")]
    UnknownHandler(String),
}

// ============================================================================
// Transport Errors (chat platform calls)
// ============================================================================

/// A chat-platform call failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("discord api error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("invalid reaction symbol {0:?}")]
    InvalidSymbol(String),

    #[error("transport rejected request: {0}")]
    Rejected(String),
}

// ============================================================================
// Voice Errors
// ============================================================================

/// Voice connection and audio pipe failures.
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("not connected to a voice channel")]
    NotConnected,

    #[error("failed to join voice channel: {0}")]
    Join(String),

    #[error("failed to leave voice channel: {0}")]
    Leave(String),

    #[error("failed to start audio pipe: {0}")]
    Stream(#[from] std::io::Error),
}

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur while running a command handler or a continuation.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Daemon(#[from] DaemonError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Daemon(e) if e.is_unavailable() => "daemon_unavailable",
            Self::Daemon(_) => "daemon_error",
            Self::Transport(_) => "transport_error",
        }
    }

    /// Text shown to the user, if this failure warrants a reply.
    ///
    /// Only an unreachable daemon is reported; everything else is logged and
    /// the command is dropped silently.
    pub fn user_notice(&self) -> Option<&'static str> {
        match self {
            Self::Daemon(e) if e.is_unavailable() => Some("Could not complete request."),
            _ => None,
        }
    }
}

// ============================================================================
// Dispatch Errors
// ============================================================================

/// Why a recognised command produced no (complete) response.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("command {command} failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: HandlerError,
    },

    #[error("failed to send response for {command}: {source}")]
    Send {
        command: String,
        #[source]
        source: TransportError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_daemon_is_user_visible() {
        let unavailable = HandlerError::Daemon(DaemonError::Unavailable("refused".into()));
        assert_eq!(unavailable.user_notice(), Some("Could not complete request."));
        assert_eq!(unavailable.error_code(), "daemon_unavailable");

        let ack = mpd_proto::AckError::parse("[50@0] {add} No such directory").unwrap();
        let rejected = HandlerError::Daemon(DaemonError::Rejected(ack));
        assert_eq!(rejected.user_notice(), None);
        assert_eq!(rejected.error_code(), "daemon_error");

        let transport = HandlerError::Transport(TransportError::Rejected("gone".into()));
        assert_eq!(transport.user_notice(), None);
        assert_eq!(transport.error_code(), "transport_error");
    }

    #[test]
    fn registry_error_messages() {
        let err = RegistryError::DuplicateAlias {
            alias: "np".into(),
            command: "nowplaying".into(),
            owner: "playing".into(),
        };
        assert_eq!(
            err.to_string(),
            "alias \"np\" of \"nowplaying\" is already taken by \"playing\""
        );
    }
}
