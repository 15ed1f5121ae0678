//! Symbol aggregator (consumer).
//!
//! Sole consumer of the symbol queue. Builds one word at a time out of
//! dots and dashes and hands it off on the next gap:
//!
//! ```text
//! symbol ──▶ Sending && Running? ──no──▶ ignored
//!                 │ yes (gate closes: Running → Waiting)
//!                 ▼
//!            gap? ──no──▶ append to word
//!                 │ yes
//!                 ▼
//!            word empty? ──yes──▶ nothing
//!                 │ no
//!                 ▼
//!            PeerLink Off → Flush::Render(word)
//!            PeerLink On  → Flush::Transmit(word)
//! ```
//!
//! The word is moved out on flush, so the buffer is empty after every gap.

use crate::control::{ControlState, PeerLink};
use crate::diagnostics::{Counter, Diagnostics};
use crate::symbol::Symbol;
use crate::word::Word;

/// Where a finished word goes.
#[derive(Debug, PartialEq, Eq)]
pub enum Flush {
    /// Show and key locally.
    Render(Word),
    /// Send as one line to the peer.
    Transmit(Word),
}

/// Outcome of one symbol.
#[derive(Debug, PartialEq, Eq)]
pub enum Accept {
    /// Gate closed or not Sending; symbol discarded.
    Ignored,
    /// Appended to the word in progress.
    Appended,
    /// Gap with nothing buffered.
    EmptyGap,
    /// Gap ended a word.
    Flushed(Flush),
    /// Word exceeded capacity and was reset.
    Overflow,
}

/// Word-in-progress owner.
#[derive(Default)]
pub struct Aggregator {
    word: Word,
}

impl Aggregator {
    pub const fn new() -> Self {
        Self { word: Word::new() }
    }

    /// Current partial word.
    pub fn word(&self) -> &Word {
        &self.word
    }

    /// Process one received symbol.
    pub fn accept(
        &mut self,
        symbol: Symbol,
        control: &ControlState,
        diagnostics: &Diagnostics,
    ) -> Accept {
        if !control.try_consume_arm() {
            return Accept::Ignored;
        }
        if control.take_clear_request() {
            self.word.clear();
        }

        if symbol.is_gap() {
            if self.word.is_empty() {
                return Accept::EmptyGap;
            }
            let word = self.word.take();
            return Accept::Flushed(match control.peer() {
                PeerLink::Off => Flush::Render(word),
                PeerLink::On => Flush::Transmit(word),
            });
        }

        match self.word.push(symbol.as_char()) {
            Ok(()) => Accept::Appended,
            Err(e) => {
                diagnostics.record(Counter::WordOverflows);
                log::warn!("aggregator: {}", e);
                Accept::Overflow
            }
        }
    }
}
