//! Global log stream instance.
//!
//! Producers: both button interrupts. Consumer: the supervisor loop,
//! which forwards entries to the `log` facade.

use crate::logging::LogStream;

/// Interrupt log stream.
pub static LOG_STREAM: LogStream = LogStream::new();
