//! # RustTiltMorse
//!
//! Tilt-gesture Morse transceiver with a lock-free control plane.
//!
//! ## Architecture
//!
//! ```text
//! Buttons (ISR) ──▶ ControlState ◀── read by every task
//!
//! Sensor ──▶ TiltSampler ──▶ [symbol queue] ──▶ Aggregator ──┬──▶ render queue ──▶ Renderer
//!                                                             └──▶ peer link
//! Console / peer bytes ──▶ LineReader ──▶ codec ──▶ render queue
//! ```
//!
//! - Only the button interrupt changes mode and peer link.
//! - Words are owned values moved from producer to renderer. No two tasks
//!   ever reach the same word buffer.
//! - One task owns the output devices.

#![cfg_attr(not(test), no_std)]

pub mod aggregator;
pub mod config;
pub mod console;
pub mod control;
pub mod debounce;
pub mod diagnostics;
pub mod escape;
pub mod hal;
pub mod line_reader;
pub mod log_globals;
pub mod logging;
pub mod morse;
pub mod peer;
pub mod queue;
pub mod render;
pub mod sampler;
pub mod symbol;
pub mod tasks;
pub mod word;

pub use config::CONFIG;
pub use control::{Button, ControlState, PeerLink, ProgramMode, ProgramState, Transition};
pub use debounce::Debouncer;
pub use diagnostics::{Counter, Diagnostics};
pub use log_globals::LOG_STREAM;
pub use symbol::Symbol;
pub use word::{Word, WordOverflow};
