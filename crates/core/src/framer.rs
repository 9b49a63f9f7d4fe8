//! Message Framer
//!
//! Turns an open-ended sequence of transport chunks into newline-delimited
//! protocol records. Chunk boundaries are arbitrary: a record may arrive in
//! many pieces, and one chunk may carry many records. Only newline bytes decide
//! where a record ends.
//!
//! The carry buffer holds raw bytes rather than text, so a multi-byte UTF-8
//! character split across two chunks is decoded only once it is complete.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One complete line of protocol text, whitespace-trimmed and never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolRecord(String);

impl ProtocolRecord {
    /// Build a record from a line of text.
    ///
    /// Returns `None` when the line is empty or whitespace-only.
    pub fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The record text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the record and return its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ProtocolRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProtocolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Newline framer with a carry buffer for the trailing partial record.
///
/// Chunks must be fed in transport order by a single consumer.
#[derive(Debug, Default)]
pub struct MessageFramer {
    carry: Vec<u8>,
}

impl MessageFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every record it completes.
    ///
    /// Bytes after the last newline stay in the carry buffer until a later
    /// chunk (or [`finish`](Self::finish)) completes them.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ProtocolRecord> {
        let Some(last_newline) = chunk.iter().rposition(|b| *b == b'\n') else {
            self.carry.extend_from_slice(chunk);
            return Vec::new();
        };

        self.carry.extend_from_slice(&chunk[..=last_newline]);
        let complete = std::mem::replace(&mut self.carry, chunk[last_newline + 1..].to_vec());

        complete
            .split(|b| *b == b'\n')
            .filter_map(|line| ProtocolRecord::from_line(&String::from_utf8_lossy(line)))
            .collect()
    }

    /// Flush the carry buffer at end of stream.
    ///
    /// A trailing record without a final newline is emitted here; a blank
    /// residue produces nothing.
    pub fn finish(&mut self) -> Option<ProtocolRecord> {
        let residual = std::mem::take(&mut self.carry);
        ProtocolRecord::from_line(&String::from_utf8_lossy(&residual))
    }

    /// Discard any buffered partial record.
    pub fn reset(&mut self) {
        self.carry.clear();
    }

    /// Number of bytes currently held in the carry buffer.
    pub fn pending_len(&self) -> usize {
        self.carry.len()
    }
}
