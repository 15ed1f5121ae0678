//! Peer link protocol.
//!
//! One word per line, newline terminated, best effort: no ack, no retry,
//! no checksum. Words never contain the delimiter, so no escaping either.

use embedded_io::Write;

use crate::console::{Feed, LineBuffer};
use crate::diagnostics::{Counter, Diagnostics};
use crate::word::Word;

/// Line delimiter on the wire.
pub const DELIMITER: u8 = b'\n';

/// Write one word and its delimiter.
pub fn transmit<W: Write>(port: &mut W, word: &Word) -> Result<(), W::Error> {
    port.write_all(word.as_bytes())?;
    port.write_all(&[DELIMITER])?;
    port.flush()
}

/// [`transmit`], counting and logging failure instead of returning it.
pub fn transmit_best_effort<W: Write>(port: &mut W, word: &Word, diagnostics: &Diagnostics) {
    if let Err(e) = transmit(port, word) {
        diagnostics.record(Counter::PeerTxFailures);
        log::warn!("peer transmit failed ({:?}), word lost", e);
    }
}

/// Receive side: assembles incoming bytes into words.
#[derive(Default)]
pub struct PeerReceiver {
    line: LineBuffer,
}

impl PeerReceiver {
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Feed one received byte; returns a word when a line completes.
    ///
    /// Empty lines produce nothing. Overflow resets the line and is counted.
    /// Bytes that are not valid UTF-8 arrive as `?` and are counted.
    pub fn feed(&mut self, byte: u8, diagnostics: &Diagnostics) -> Option<Word> {
        match self.line.feed(byte) {
            Feed::Pending => None,
            Feed::Overflow => {
                diagnostics.record(Counter::LineOverflows);
                log::warn!("peer line overflow, discarded");
                None
            }
            Feed::Complete => {
                let replaced = self.line.repair_utf8();
                if replaced > 0 {
                    diagnostics.record(Counter::InvalidInput);
                    log::warn!("peer: {} invalid byte(s) replaced", replaced);
                }
                let word = Word::from_text(self.line.as_str());
                self.line.clear();
                match word {
                    Ok(word) if !word.is_empty() => Some(word),
                    Ok(_) => None,
                    Err(e) => {
                        diagnostics.record(Counter::WordOverflows);
                        log::warn!("peer: {}", e);
                        None
                    }
                }
            }
        }
    }
}
