//! Chunk framing
//!
//! Turns arbitrarily split byte chunks into complete text lines. Framing
//! happens on raw bytes, so a multi-byte UTF-8 sequence that straddles a
//! chunk boundary is never decoded half-way: `\n` cannot occur inside one,
//! and each line is decoded only once its terminator has arrived.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{AnyDelimiterCodec, Decoder};
use tracing::warn;

/// Newline splitter over a growing byte buffer
#[derive(Debug)]
pub struct ChunkFramer {
    codec: AnyDelimiterCodec,

    /// Bytes received after the last newline
    buffer: BytesMut,
}

impl Default for ChunkFramer {
    fn default() -> Self {
        Self {
            codec: AnyDelimiterCodec::new(b"\n".to_vec(), b"\n".to_vec()),
            buffer: BytesMut::new(),
        }
    }
}

impl ChunkFramer {
    /// Create an empty framer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completes, without terminators
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        loop {
            match self.codec.decode(&mut self.buffer) {
                Ok(Some(line)) => lines.push(decode_line(line)),
                Ok(None) => break,
                Err(e) => {
                    warn!("Line framing failed: {}", e);
                    break;
                }
            }
        }
        lines
    }

    /// Signal end of stream and return the unterminated remainder, if any
    pub fn flush(&mut self) -> Option<String> {
        match self.codec.decode_eof(&mut self.buffer) {
            Ok(tail) => tail.map(decode_line),
            Err(e) => {
                warn!("Line framing failed at end of stream: {}", e);
                None
            }
        }
    }

    /// Raw bytes held since the last newline
    pub fn carry(&self) -> &[u8] {
        &self.buffer
    }

    /// True if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Invalid sequences in a complete line become U+FFFD
fn decode_line(line: Bytes) -> String {
    String::from_utf8_lossy(&line).into_owned()
}
