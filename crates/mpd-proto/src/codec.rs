//! Line-based codec for tokio.
//!
//! Decodes newline-terminated daemon output into [`Frame`]s and encodes
//! [`Request`]s into command lines.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};
use crate::frame::Frame;
use crate::request::Request;

/// Default maximum line length. Tag values (comments, lyrics) can be long.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Codec turning daemon output into frames.
pub struct MpdCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl MpdCodec {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom line limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }
}

impl Default for MpdCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for MpdCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
            self.next_index = src.len();
            if src.len() > self.max_len {
                return Err(ProtocolError::LineTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }
            return Ok(None);
        };

        let line = src.split_to(self.next_index + offset + 1);
        self.next_index = 0;

        if line.len() > self.max_len {
            return Err(ProtocolError::LineTooLong {
                actual: line.len(),
                limit: self.max_len,
            });
        }

        let text = std::str::from_utf8(&line).map_err(|e| ProtocolError::InvalidUtf8 {
            byte_pos: e.valid_up_to(),
        })?;

        Frame::parse(text).map(Some)
    }
}

impl Encoder<Request> for MpdCodec {
    type Error = ProtocolError;

    fn encode(&mut self, req: Request, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(req.to_line()?.as_bytes());
        Ok(())
    }
}
