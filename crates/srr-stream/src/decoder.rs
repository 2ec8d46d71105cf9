//! Cross-chunk reassembly of line-delimited events.

use tracing::debug;

use crate::event::ImportEvent;

/// Reassembles newline-delimited events from arbitrarily-chunked bytes.
///
/// Each chunk is appended to an internal buffer; every complete line is
/// parsed independently and the trailing fragment is retained for the next
/// chunk. Splitting happens at the byte level, so multi-byte UTF-8
/// sequences (and JSON string escapes) survive chunk boundaries intact.
/// Lines that fail to parse are dropped, never surfaced. Events come out
/// in the exact order their terminating newlines appear in the stream.
#[derive(Debug, Default)]
pub struct EventDecoder {
    buffer: Vec<u8>,
}

impl EventDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns the events completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<ImportEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_line(&line[..line.len() - 1]) {
                events.push(event);
            }
        }
        events
    }

    /// Bytes buffered as an incomplete trailing line.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Close the stream. Any unterminated trailing fragment is discarded;
    /// the producer terminates every line before closing.
    pub fn finish(self) {
        if !self.buffer.is_empty() {
            debug!(
                bytes = self.buffer.len(),
                "discarding unterminated trailing fragment"
            );
        }
    }
}

fn parse_line(line: &[u8]) -> Option<ImportEvent> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_slice(line) {
        Ok(event) => Some(event),
        Err(error) => {
            debug!(%error, "dropping malformed stream line");
            None
        }
    }
}
