//! Module: config
//!
//! Purpose: Configuration for RustTiltMorse.
//!
//! Architecture:
//! - Compile-time constants: buffer capacities, thresholds, periods
//! - `board`: pin map, UART setup, task priorities
//! - `Config`: the few values the console may change at runtime
//! - All runtime config atomically accessible (lock-free)
//!
//! Nothing is persisted; every boot starts from the defaults below.

pub mod board;

use core::sync::atomic::{AtomicU16, AtomicU8, Ordering};

/// Tilt angle (degrees) past which a sample counts as a dot or dash.
pub const TILT_THRESHOLD_DEG: f32 = 10.0;

/// Sampler period in milliseconds.
pub const SAMPLE_PERIOD_MS: u32 = 500;

/// How long the sampler waits for room in the symbol queue.
pub const SYMBOL_SEND_TIMEOUT_MS: u32 = 100;

/// Symbol queue capacity.
pub const SYMBOL_QUEUE_CAPACITY: usize = 10;

/// Render queue capacity (words waiting for the renderer).
pub const RENDER_QUEUE_CAPACITY: usize = 2;

/// Minimum interval between two accepted presses of the same button.
pub const DEBOUNCE_MS: u32 = 200;

/// Input line capacity in bytes (console and peer).
pub const LINE_CAPACITY: usize = 100;

/// Word / codec output capacity in bytes.
pub const WORD_CAPACITY: usize = 600;

/// Line reader poll interval when no input is pending.
pub const LINE_POLL_MS: u32 = 10;

/// Sidetone frequency while a Morse element is on.
pub const SIDETONE_HZ: u32 = 700;

/// Default Morse time unit.
pub const DEFAULT_UNIT_MS: u16 = 200;

/// Accepted range for `:unit`.
pub const UNIT_MS_MIN: u16 = 20;
pub const UNIT_MS_MAX: u16 = 2000;

/// Default theme odds: one word in six.
pub const DEFAULT_THEME_ONE_IN: u8 = 6;

/// Value rejected by a runtime setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange;

/// Runtime configuration.
///
/// Written by the console, read by the renderer before each word.
pub struct Config {
    unit_ms: AtomicU16,
    theme_one_in: AtomicU8,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            unit_ms: AtomicU16::new(DEFAULT_UNIT_MS),
            theme_one_in: AtomicU8::new(DEFAULT_THEME_ONE_IN),
        }
    }

    #[inline]
    pub fn unit_ms(&self) -> u16 {
        self.unit_ms.load(Ordering::Relaxed)
    }

    /// Set the Morse time unit, rejecting values outside
    /// `UNIT_MS_MIN..=UNIT_MS_MAX`.
    pub fn set_unit_ms(&self, ms: u16) -> Result<(), OutOfRange> {
        if !(UNIT_MS_MIN..=UNIT_MS_MAX).contains(&ms) {
            return Err(OutOfRange);
        }
        self.unit_ms.store(ms, Ordering::Relaxed);
        Ok(())
    }

    /// Theme odds; 0 disables the theme.
    #[inline]
    pub fn theme_one_in(&self) -> u8 {
        self.theme_one_in.load(Ordering::Relaxed)
    }

    pub fn set_theme_one_in(&self, one_in: u8) {
        self.theme_one_in.store(one_in, Ordering::Relaxed);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Global runtime configuration.
pub static CONFIG: Config = Config::new();
