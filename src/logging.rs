//! Interrupt-safe logging for RustTiltMorse.
//!
//! # Architecture
//!
//! ```text
//! Button ISR / hot path     LogStream           Supervisor loop
//! ─────────────────────     ─────────           ───────────────
//!
//! rt_log!() ──────────────▶ [L0][L1][L2] ─────▶ drain_to_log() ──▶ log::info!() …
//! non-blocking               lock-free           blocking ok
//!                            ring buffer
//! ```
//!
//! # Rules
//!
//! - The button interrupt shall NEVER call `log::*` or `println!`.
//! - Interrupt context uses the `rt_*!` macros.
//! - Messages are dropped, never blocked on, when the ring is full.
//! - Everything outside interrupt context uses the `log` facade directly.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 80;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 32;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in milliseconds since boot.
    pub timestamp_ms: u32,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_ms: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text, up to the last whole character.
    pub fn message(&self) -> &str {
        let bytes = &self.msg[..self.len as usize];
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            // Truncated mid-character: keep the valid prefix
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

struct Slot {
    ready: AtomicBool,
    entry: UnsafeCell<LogEntry>,
}

impl Slot {
    const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            entry: UnsafeCell::new(LogEntry::EMPTY),
        }
    }
}

/// Lock-free log stream (MPSC: multiple producers, single consumer).
///
/// - Producers reserve a slot with a CAS on `write_idx`, only when one is free
/// - Push never blocks (drops message if full)
/// - A slot becomes visible to the consumer once its `ready` flag is set
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    slots: [Slot; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: a slot is written only by the producer that reserved it and read
// only by the single consumer after observing `ready` with Acquire.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            slots: [const { Slot::new() }; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry (interrupt-safe, never blocks).
    ///
    /// Returns `true` if message was queued, `false` if dropped (ring full).
    #[inline]
    pub fn push(&self, timestamp_ms: u32, level: LogLevel, msg: &[u8]) -> bool {
        let mut write = self.write_idx.load(Ordering::Relaxed);
        loop {
            let read = self.read_idx.load(Ordering::Acquire);
            if write.wrapping_sub(read) >= N as u32 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.write_idx.compare_exchange_weak(
                write,
                write.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => write = current,
            }
        }

        let slot = &self.slots[(write as usize) & Self::MASK];
        let len = msg.len().min(MAX_MSG_LEN);

        // SAFETY: the CAS above handed this index to us alone, and the
        // consumer does not touch the slot until `ready` is set.
        unsafe {
            let entry = &mut *slot.entry.get();
            entry.timestamp_ms = timestamp_ms;
            entry.level = level;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);
        }
        slot.ready.store(true, Ordering::Release);
        true
    }

    /// Drain next log entry (supervisor only).
    ///
    /// Returns `None` if no entries available, or if the oldest reserved
    /// slot is still being written.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let slot = &self.slots[(read as usize) & Self::MASK];

        if !slot.ready.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: `ready` was published by the producer with Release.
        let entry = unsafe { *slot.entry.get() };
        slot.ready.store(false, Ordering::Relaxed);
        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Read and reset the dropped counter.
    #[inline]
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    /// Get number of entries reserved but not yet drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward every queued entry to the `log` facade.
///
/// Reports, once per call, how many entries were dropped since the last
/// call. Returns the number of entries forwarded.
pub fn drain_to_log<const N: usize>(stream: &LogStream<N>) -> usize {
    let mut forwarded = 0;
    while let Some(entry) = stream.drain() {
        log::log!(
            entry.level.into(),
            "[{:>8}ms] {}",
            entry.timestamp_ms,
            entry.message()
        );
        forwarded += 1;
    }

    let dropped = stream.take_dropped();
    if dropped > 0 {
        log::warn!("interrupt log ring full, {} entries dropped", dropped);
    }
    forwarded
}

/// Render `args` into `buf`, cutting off whatever does not fit.
///
/// Returns the number of bytes used. The cut may fall inside a UTF-8
/// sequence; [`LogEntry::message`] drops the partial character.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    struct Truncating<'a> {
        buf: &'a mut [u8],
        used: usize,
    }

    impl core::fmt::Write for Truncating<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let room = &mut self.buf[self.used..];
            let n = s.len().min(room.len());
            room[..n].copy_from_slice(&s.as_bytes()[..n]);
            self.used += n;
            Ok(())
        }
    }

    let mut out = Truncating { buf, used: 0 };
    let _ = core::fmt::write(&mut out, args);
    out.used
}

/// Interrupt-safe log macro.
///
/// # Example
///
/// ```ignore
/// rt_log!(LogLevel::Info, LOG_STREAM, now_ms, "button {:?}", button);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len]);
    }};
}

/// Interrupt-safe info log.
#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Interrupt-safe debug log.
#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, b"Mode: Receiving"));
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_ms, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message(), "Mode: Receiving");

        assert!(stream.drain().is_none());
        assert_eq!(stream.pending(), 0);
    }

    #[test]
    fn test_log_stream_full_does_not_advance() {
        let stream = LogStream::<4>::new();

        for i in 0..4 {
            assert!(stream.push(i, LogLevel::Info, b"x"));
        }

        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert!(!stream.push(6, LogLevel::Info, b"6"));
        assert_eq!(stream.dropped(), 2);
        assert_eq!(stream.pending(), 4);

        // Drops never corrupt the order of what was accepted
        assert_eq!(stream.drain().unwrap().timestamp_ms, 0);
        assert!(stream.push(7, LogLevel::Info, b"7"));
        let order: Vec<u32> = core::iter::from_fn(|| stream.drain())
            .map(|e| e.timestamp_ms)
            .collect();
        assert_eq!(order, vec![1, 2, 3, 7]);
    }

    #[test]
    fn test_long_message_truncated() {
        let stream = LogStream::<4>::new();
        let long = [b'a'; MAX_MSG_LEN + 20];
        assert!(stream.push(0, LogLevel::Warn, &long));
        assert_eq!(stream.drain().unwrap().len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_truncation_keeps_whole_characters() {
        let mut buf = [0u8; 4];
        let len = format_to_buffer(&mut buf, format_args!("abc→"));
        assert_eq!(len, 4);

        let mut entry = LogEntry::default();
        entry.msg[..len].copy_from_slice(&buf[..len]);
        entry.len = len as u8;
        assert_eq!(entry.message(), "abc");
    }

    #[test]
    fn test_take_dropped_resets() {
        let stream = LogStream::<2>::new();
        stream.push(0, LogLevel::Info, b"a");
        stream.push(0, LogLevel::Info, b"b");
        stream.push(0, LogLevel::Info, b"c");
        assert_eq!(stream.take_dropped(), 1);
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_format_to_buffer() {
        let mut buf = [0u8; 8];
        let len = format_to_buffer(&mut buf, format_args!("Unit {}ms", 200));
        assert_eq!(&buf[..len], b"Unit 200");
    }

    #[test]
    fn test_rt_macro_pushes() {
        let stream = LogStream::<4>::new();
        crate::rt_debug!(stream, 42, "bounce on {:?}", 'B');
        let entry = stream.drain().unwrap();
        assert_eq!(entry.level, LogLevel::Debug);
        assert_eq!(entry.message(), "bounce on 'B'");
    }

    #[test]
    fn test_mpsc_multiple_producers() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<64>::new());
        let mut handles = vec![];

        for i in 0..4 {
            let stream = Arc::clone(&stream);
            handles.push(thread::spawn(move || {
                for j in 0..10 {
                    let msg = format!("Thread {} msg {}", i, j);
                    stream.push(j, LogLevel::Info, msg.as_bytes());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let mut count = 0;
        while stream.drain().is_some() {
            count += 1;
        }
        assert_eq!(count, 40, "All messages should be present");
    }

    #[test]
    fn test_mpsc_concurrent_with_consumer() {
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<16>::new());
        let done = Arc::new(AtomicBool::new(false));

        let consumer = {
            let stream = Arc::clone(&stream);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut seen = 0u32;
                loop {
                    match stream.drain() {
                        Some(_) => seen += 1,
                        None if done.load(Ordering::Acquire) && stream.pending() == 0 => break,
                        None => thread::yield_now(),
                    }
                }
                seen
            })
        };

        let producers: Vec<_> = (0..4)
            .map(|_| {
                let stream = Arc::clone(&stream);
                thread::spawn(move || {
                    for j in 0..200 {
                        stream.push(j, LogLevel::Debug, b"tick");
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }
        done.store(true, Ordering::Release);

        let seen = consumer.join().unwrap();
        assert_eq!(seen + stream.dropped(), 800);
    }
}
