//! ESP-IDF implementations of the pipeline seams.
//!
//! Everything here is I/O glue. Decisions live in the core modules.

use esp_idf_svc::hal::delay::{TickType, BLOCK, NON_BLOCK};
use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_svc::hal::io::EspIOError;
use esp_idf_svc::hal::ledc::LedcDriver;
use esp_idf_svc::hal::task::queue::Queue;
use esp_idf_svc::hal::uart::{UartRxDriver, UartTxDriver};
use esp_idf_svc::sys::{self, esp, EspError};

use crate::line_reader::ByteSource;
use crate::queue::{SymbolReceiver, SymbolSender};
use crate::render::{RandomSource, SignalOutput};
use crate::symbol::Symbol;

/// Milliseconds since boot, from the high-resolution timer.
#[inline]
pub fn now_ms() -> u32 {
    // SAFETY: esp_timer_get_time is ISR-safe and has no preconditions
    (unsafe { sys::esp_timer_get_time() } / 1000) as u32
}

// --- Symbol queue ---

/// FreeRTOS queue of symbols.
pub struct SymbolQueue {
    queue: Queue<Symbol>,
}

impl SymbolQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Queue::new(capacity),
        }
    }
}

impl SymbolSender for SymbolQueue {
    fn send_within(&self, symbol: Symbol, timeout_ms: u32) -> Result<(), Symbol> {
        let ticks = TickType::new_millis(u64::from(timeout_ms)).ticks();
        self.queue
            .send_back(symbol, ticks)
            .map(|_| ())
            .map_err(|_| symbol)
    }
}

impl SymbolReceiver for SymbolQueue {
    fn recv(&self) -> Symbol {
        loop {
            if let Some((symbol, _)) = self.queue.recv_front(BLOCK) {
                return symbol;
            }
        }
    }
}

// --- UARTs ---

/// Non-blocking byte reader on a UART receive half (console or peer).
pub struct UartByteSource<'d> {
    rx: UartRxDriver<'d>,
}

impl<'d> UartByteSource<'d> {
    pub fn new(rx: UartRxDriver<'d>) -> Self {
        Self { rx }
    }
}

impl ByteSource for UartByteSource<'_> {
    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.rx.read(&mut byte, NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}

/// Console output on a UART transmit half.
pub struct ConsoleWriter<'d> {
    tx: UartTxDriver<'d>,
}

impl<'d> ConsoleWriter<'d> {
    pub fn new(tx: UartTxDriver<'d>) -> Self {
        Self { tx }
    }
}

impl core::fmt::Write for ConsoleWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        // Terminals expect CRLF
        for (i, part) in s.split('\n').enumerate() {
            if i > 0 {
                self.tx.write(b"\r\n").map_err(|_| core::fmt::Error)?;
            }
            if !part.is_empty() {
                self.tx
                    .write(part.as_bytes())
                    .map_err(|_| core::fmt::Error)?;
            }
        }
        Ok(())
    }
}

/// Transmit half of the peer link.
pub struct PeerTx<'d> {
    tx: UartTxDriver<'d>,
}

impl<'d> PeerTx<'d> {
    pub fn new(tx: UartTxDriver<'d>) -> Self {
        Self { tx }
    }
}

impl embedded_io::ErrorType for PeerTx<'_> {
    type Error = EspIOError;
}

impl embedded_io::Write for PeerTx<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.write(buf).map_err(EspIOError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.wait_done(BLOCK).map_err(EspIOError)
    }
}

// --- Outputs ---

/// LED + LEDC buzzer. The display is mirrored to the log.
pub struct EspSignalOutput<'d> {
    led: PinDriver<'d, AnyOutputPin, Output>,
    buzzer: LedcDriver<'d>,
    speed_mode: sys::ledc_mode_t,
    timer: sys::ledc_timer_t,
}

impl<'d> EspSignalOutput<'d> {
    /// `timer` must be the LEDC timer `buzzer` was created on.
    pub fn new(
        led: PinDriver<'d, AnyOutputPin, Output>,
        buzzer: LedcDriver<'d>,
        timer: sys::ledc_timer_t,
    ) -> Self {
        Self {
            led,
            buzzer,
            speed_mode: sys::ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer,
        }
    }

    fn tone(&mut self, freq_hz: u32) -> Result<(), EspError> {
        // SAFETY: the timer was configured by the LEDC driver we own
        esp!(unsafe { sys::ledc_set_freq(self.speed_mode, self.timer, freq_hz) })?;
        let half = self.buzzer.get_max_duty() / 2;
        self.buzzer.set_duty(half)
    }
}

impl SignalOutput for EspSignalOutput<'_> {
    fn light(&mut self, on: bool) {
        let result = if on {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
        if let Err(e) = result {
            log::warn!("led: {}", e);
        }
    }

    fn sound(&mut self, freq_hz: Option<u32>) {
        let result = match freq_hz {
            Some(hz) => self.tone(hz),
            None => self.buzzer.set_duty(0),
        };
        if let Err(e) = result {
            log::warn!("buzzer: {}", e);
        }
    }

    fn show_text(&mut self, text: &str) {
        log::info!("display: {}", text);
    }

    fn clear_text(&mut self) {
        log::debug!("display cleared");
    }
}

/// Hardware RNG.
pub struct EspRandom;

impl RandomSource for EspRandom {
    fn next_u32(&mut self) -> u32 {
        // SAFETY: esp_random has no preconditions
        unsafe { sys::esp_random() }
    }
}
