//! Runtime diagnostics for RustTiltMorse.
//!
//! Every recoverable failure in the pipeline is counted here instead of
//! being surfaced as an error to a caller that cannot act on it: a dropped
//! symbol, an overflowing line, a failed peer write. Counters are plain
//! atomics so interrupt handlers and every task can bump them without locks.
//!
//! # Usage
//!
//! ```ignore
//! static DIAGNOSTICS: Diagnostics = Diagnostics::new();
//!
//! // In the sampler, when the symbol queue stays full:
//! DIAGNOSTICS.record(Counter::SymbolsDropped);
//!
//! // From the console:
//! let snap = DIAGNOSTICS.snapshot();
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

/// What went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Counter {
    /// Symbol discarded because the symbol queue stayed full.
    SymbolsDropped = 0,
    /// Sensor read failed; the sampling period was skipped.
    SensorFaults = 1,
    /// Input line exceeded its buffer and was reset.
    LineOverflows = 2,
    /// Word or codec output exceeded its buffer and was reset.
    WordOverflows = 3,
    /// Render job discarded because the renderer was busy.
    RenderDrops = 4,
    /// Peer write failed; the word was lost.
    PeerTxFailures = 5,
    /// Input line carried invalid UTF-8; the bad bytes were replaced.
    InvalidInput = 6,
}

const COUNTERS: usize = 7;

/// Lock-free failure counters.
pub struct Diagnostics {
    counts: [AtomicU32; COUNTERS],
    /// Symbols successfully enqueued; the denominator for drop rate.
    symbols_sent: AtomicU32,
}

impl Diagnostics {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self {
            counts: [const { AtomicU32::new(0) }; COUNTERS],
            symbols_sent: AtomicU32::new(0),
        }
    }

    /// Bump a failure counter.
    #[inline]
    pub fn record(&self, counter: Counter) {
        self.counts[counter as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Bump the delivered-symbol counter.
    #[inline]
    pub fn record_symbol_sent(&self) {
        self.symbols_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value of one counter.
    #[inline]
    pub fn get(&self, counter: Counter) -> u32 {
        self.counts[counter as usize].load(Ordering::Relaxed)
    }

    /// Zero everything (console `:stats reset`).
    pub fn reset(&self) {
        for count in &self.counts {
            count.store(0, Ordering::Relaxed);
        }
        self.symbols_sent.store(0, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            symbols_sent: self.symbols_sent.load(Ordering::Relaxed),
            symbols_dropped: self.get(Counter::SymbolsDropped),
            sensor_faults: self.get(Counter::SensorFaults),
            line_overflows: self.get(Counter::LineOverflows),
            word_overflows: self.get(Counter::WordOverflows),
            render_drops: self.get(Counter::RenderDrops),
            peer_tx_failures: self.get(Counter::PeerTxFailures),
            invalid_input: self.get(Counter::InvalidInput),
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the counters at a point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub symbols_sent: u32,
    pub symbols_dropped: u32,
    pub sensor_faults: u32,
    pub line_overflows: u32,
    pub word_overflows: u32,
    pub render_drops: u32,
    pub peer_tx_failures: u32,
    pub invalid_input: u32,
}
