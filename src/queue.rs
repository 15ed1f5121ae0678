//! Symbol queue seams.
//!
//! On the device the queue is a FreeRTOS queue of capacity 10; on the host
//! any bounded channel will do. Producers wait a bounded time and then drop,
//! consumers block.

use crate::diagnostics::{Counter, Diagnostics};
use crate::symbol::Symbol;

/// Producer side of the symbol queue.
pub trait SymbolSender {
    /// Enqueue, waiting at most `timeout_ms` for room.
    ///
    /// Gives the symbol back if the queue stayed full.
    fn send_within(&self, symbol: Symbol, timeout_ms: u32) -> Result<(), Symbol>;
}

/// Consumer side of the symbol queue.
pub trait SymbolReceiver {
    /// Block until a symbol arrives.
    fn recv(&self) -> Symbol;
}

/// Result of [`publish`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Publish {
    Sent,
    Dropped,
}

/// Send with a bounded wait; a full queue drops and reports the symbol.
pub fn publish<Q: SymbolSender + ?Sized>(
    queue: &Q,
    symbol: Symbol,
    timeout_ms: u32,
    diagnostics: &Diagnostics,
) -> Publish {
    match queue.send_within(symbol, timeout_ms) {
        Ok(()) => {
            diagnostics.record_symbol_sent();
            Publish::Sent
        }
        Err(dropped) => {
            diagnostics.record(Counter::SymbolsDropped);
            log::warn!(
                "symbol queue full after {}ms, dropped '{}'",
                timeout_ms,
                dropped.as_char()
            );
            Publish::Dropped
        }
    }
}
