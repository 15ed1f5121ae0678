//! Per-button debounce.
//!
//! Lives for the whole program as a static, written only from the button
//! interrupt. Timestamps are milliseconds from a monotonic clock and are
//! compared with wrapping arithmetic, so the ~49 day rollover of a `u32`
//! is harmless.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::control::Button;

const BUTTONS: usize = 2;

/// Minimum-interval filter, keyed by button.
pub struct Debouncer {
    window_ms: u32,
    last_ms: [AtomicU32; BUTTONS],
    seen: [AtomicBool; BUTTONS],
}

impl Debouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_ms: [const { AtomicU32::new(0) }; BUTTONS],
            seen: [const { AtomicBool::new(false) }; BUTTONS],
        }
    }

    /// Accept or reject an edge of `button` at `now_ms`.
    ///
    /// The window is measured from the last *accepted* edge; rejected edges
    /// do not extend it.
    pub fn accept(&self, button: Button, now_ms: u32) -> bool {
        let i = button.index();
        let last = self.last_ms[i].load(Ordering::Relaxed);

        if self.seen[i].load(Ordering::Relaxed) && now_ms.wrapping_sub(last) < self.window_ms {
            return false;
        }

        self.last_ms[i].store(now_ms, Ordering::Relaxed);
        self.seen[i].store(true, Ordering::Relaxed);
        true
    }

    #[inline]
    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }
}
