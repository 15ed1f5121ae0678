//! Line buffer for byte-stream input (console and peer)

use crate::config::LINE_CAPACITY;

/// Stands in for each byte that is not valid UTF-8.
pub const REPLACEMENT: u8 = b'?';

/// Result of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Byte stored (or ignored), line not finished.
    Pending,
    /// Newline seen; the line is ready in the buffer.
    Complete,
    /// No room; the buffer was reset and the byte discarded.
    Overflow,
}

/// Fixed-capacity line assembler.
///
/// CR is ignored, LF completes the line. The caller calls
/// [`LineBuffer::repair_utf8`], reads the line with [`LineBuffer::as_str`]
/// and then calls [`LineBuffer::clear`].
pub struct LineBuffer {
    buf: [u8; LINE_CAPACITY],
    len: usize,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_CAPACITY],
            len: 0,
        }
    }

    /// Feed one byte from the source
    pub fn feed(&mut self, byte: u8) -> Feed {
        match byte {
            b'\r' => Feed::Pending,
            b'\n' => Feed::Complete,
            _ if self.len < LINE_CAPACITY => {
                self.buf[self.len] = byte;
                self.len += 1;
                Feed::Pending
            }
            _ => {
                self.len = 0;
                Feed::Overflow
            }
        }
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Overwrite every byte that is not part of valid UTF-8 with
    /// [`REPLACEMENT`]. Returns how many bytes were replaced.
    pub fn repair_utf8(&mut self) -> usize {
        let mut replaced = 0;
        let mut start = 0;
        while let Err(e) = core::str::from_utf8(&self.buf[start..self.len]) {
            let bad = start + e.valid_up_to();
            // Truncated sequence at the end of the line
            let bad_len = e.error_len().unwrap_or(self.len - bad);
            self.buf[bad..bad + bad_len].fill(REPLACEMENT);
            replaced += bad_len;
            start = bad + bad_len;
        }
        replaced
    }

    /// Get buffer as string slice; reads as empty until
    /// [`LineBuffer::repair_utf8`] has fixed invalid UTF-8
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
