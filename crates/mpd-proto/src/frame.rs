//! Response line classification.

use crate::error::{AckError, ProtocolError, Result};

/// One decoded line of daemon output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// `OK MPD <version>`, sent once when a connection opens.
    Greeting(String),
    /// A `key: value` pair belonging to the current response.
    Pair(String, String),
    /// `OK`, terminating a successful response.
    Ok,
    /// `ACK ...`, terminating a failed response.
    Ack(AckError),
}

impl Frame {
    /// Classify a single line with its line terminator already removed.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);

        if line == "OK" {
            return Ok(Self::Ok);
        }
        if let Some(version) = line.strip_prefix("OK MPD ") {
            return Ok(Self::Greeting(version.trim().to_string()));
        }
        if let Some(rest) = line.strip_prefix("ACK ") {
            return AckError::parse(rest)
                .map(Self::Ack)
                .ok_or_else(|| ProtocolError::MalformedLine(line.to_string()));
        }

        match line.split_once(": ") {
            Some((key, value)) if !key.is_empty() => {
                Ok(Self::Pair(key.to_string(), value.to_string()))
            }
            _ => Err(ProtocolError::MalformedLine(line.to_string())),
        }
    }
}
