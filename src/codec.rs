//! Newline-delimited text framing for the relay socket
//!
//! One frame is one line: bytes up to a `\n`, with an optional `\r`
//! before it (telnet clients send CRLF). Decoded frames are UTF-8
//! strings without the terminator; encoded frames get a bare `\n`
//! appended.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::RelayError;

/// Maximum accepted line length in bytes (64 KB).
/// A buffer that grows past this without a newline closes the connection.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Codec for the line protocol.
/// Decodes inbound lines to `String` and encodes outbound `String`s.
pub struct LineCodec {
    max_line_length: usize,
}

impl LineCodec {
    /// Creates a new LineCodec with the default maximum line length.
    pub fn new() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert one terminator-stripped line to a `String`.
/// Drops a single trailing `\r`; rejects anything that is not UTF-8.
fn into_line(bytes: &[u8]) -> Result<String, RelayError> {
    let bytes = match bytes.last() {
        Some(b'\r') => &bytes[..bytes.len() - 1],
        _ => bytes,
    };
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| RelayError::InvalidUtf8)
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = RelayError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Only scan up to the cap; a newline past it can never make a valid line
        let scan_len = src.len().min(self.max_line_length + 1);
        let Some(pos) = src[..scan_len].iter().position(|&b| b == b'\n') else {
            if src.len() > self.max_line_length {
                return Err(RelayError::LineTooLong(self.max_line_length));
            }
            return Ok(None);
        };

        let bytes = src.split_to(pos);
        src.advance(1);
        into_line(&bytes).map(Some)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            // Unterminated trailing data still counts as a final line
            None => {
                let bytes = src.split();
                into_line(&bytes).map(Some)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = RelayError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len() + 1);
        dst.put_slice(item.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
