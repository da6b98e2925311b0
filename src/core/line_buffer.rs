//! Line accumulation for inbound byte streams.
//!
//! Links deliver bytes in arbitrary chunks, while the transcript appends
//! whole blocks. The buffer holds everything after the last line feed until
//! a later chunk completes it.

use std::mem;

/// Accumulates inbound bytes and releases complete lines.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the completed block, if any.
    ///
    /// Every carriage return in the buffer is dropped. When the last line
    /// feed sits past the first byte, everything before it is returned and
    /// everything after it is kept. A buffer whose only line feed is its
    /// first byte is kept whole.
    pub fn push(&mut self, chunk: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(chunk);
        self.pending.retain(|&byte| byte != b'\r');

        match self.pending.iter().rposition(|&byte| byte == b'\n') {
            Some(last_break) if last_break > 0 => {
                let tail = self.pending.split_off(last_break + 1);
                let mut block = mem::replace(&mut self.pending, tail);
                block.truncate(last_break);
                Some(String::from_utf8_lossy(&block).into_owned())
            }
            _ => None,
        }
    }

    /// Release the retained partial line, leaving the buffer empty.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    /// Bytes waiting for a terminator.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
