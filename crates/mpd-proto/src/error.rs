//! Error types for the MPD protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// An `ACK` line returned by the daemon in place of `OK`.
///
/// Wire form: `ACK [error@command_listNum] {current_command} message_text`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ACK [{code}@{index}] {{{command}}} {message}")]
pub struct AckError {
    /// Numeric MPD error code (e.g. 50 = no such song).
    pub code: u32,
    /// Position of the failing command inside a command list.
    pub index: u32,
    /// Name of the command that failed.
    pub command: String,
    /// Human-readable message.
    pub message: String,
}

impl AckError {
    /// Parse the remainder of an `ACK` line (without the leading `ACK `).
    pub fn parse(rest: &str) -> Option<Self> {
        let rest = rest.trim_start();
        let rest = rest.strip_prefix('[')?;
        let (location, rest) = rest.split_once(']')?;
        let (code, index) = location.split_once('@')?;

        let rest = rest.trim_start().strip_prefix('{')?;
        let (command, message) = rest.split_once('}')?;

        Some(Self {
            code: code.parse().ok()?,
            index: index.parse().ok()?,
            command: command.to_string(),
            message: message.trim().to_string(),
        })
    }
}

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line was not valid UTF-8.
    #[error("invalid UTF-8 in response at byte {byte_pos}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
    },

    /// A line exceeded the codec's length limit.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// A response line matched none of the known shapes.
    #[error("malformed response line: {0:?}")]
    MalformedLine(String),

    /// The first line of a connection was not an `OK MPD` greeting.
    #[error("expected MPD greeting, got {0:?}")]
    BadGreeting(String),

    /// The daemon rejected the request.
    #[error(transparent)]
    Ack(#[from] AckError),

    /// A request argument cannot be encoded (it contains a line break).
    #[error("invalid argument: {0:?}")]
    InvalidArgument(String),

    /// The daemon closed the connection mid-response.
    #[error("connection closed by daemon")]
    ConnectionClosed,
}

impl ProtocolError {
    /// Whether the error means the connection itself is unusable.
    ///
    /// An `ACK` or a bad argument leaves the connection in a clean state;
    /// everything else requires reconnecting.
    pub fn is_connection_error(&self) -> bool {
        !matches!(self, Self::Ack(_) | Self::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ack_line() {
        let ack = AckError::parse("[50@0] {play} song doesn't exist: \"10\"").unwrap();
        assert_eq!(ack.code, 50);
        assert_eq!(ack.index, 0);
        assert_eq!(ack.command, "play");
        assert_eq!(ack.message, "song doesn't exist: \"10\"");
    }

    #[test]
    fn ack_display_matches_wire_form() {
        let ack = AckError::parse("[2@0] {search} incorrect arguments").unwrap();
        assert_eq!(ack.to_string(), "ACK [2@0] {search} incorrect arguments");
    }

    #[test]
    fn rejects_garbage_ack() {
        assert!(AckError::parse("no brackets here").is_none());
        assert!(AckError::parse("[x@0] {play} bad code").is_none());
    }

    #[test]
    fn ack_is_not_a_connection_error() {
        let ack = AckError::parse("[5@0] {foo} unknown command").unwrap();
        assert!(!ProtocolError::Ack(ack).is_connection_error());
        assert!(ProtocolError::ConnectionClosed.is_connection_error());
    }
}
