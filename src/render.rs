//! Renderer: the only code that drives the display, light and sidetone.
//!
//! # Timing
//!
//! ```text
//! '.'        on 1 unit, off 1 unit
//! '-'        on 3 units, off 1 unit
//! ' '        off 2 more units   (letter gap, 3 in total)
//! ' ' × ≥2   off 6 more units   (word gap, 7 in total)
//! other      shown, not keyed
//! ```
//!
//! Rendering blocks for the whole word on purpose: the delays are the
//! timing. Run it on the lowest-priority task.

use embedded_hal::delay::DelayNs;

use crate::config::{Config, SIDETONE_HZ};
use crate::word::Word;

/// Output devices.
pub trait SignalOutput {
    /// Indicator light.
    fn light(&mut self, on: bool);
    /// Tone at `Some(hz)`, or silence.
    fn sound(&mut self, freq_hz: Option<u32>);
    /// Replace the display text.
    fn show_text(&mut self, text: &str);
    /// Blank the display.
    fn clear_text(&mut self);
}

/// Source of randomness for the theme roll.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;
}

/// One keyed or silent interval, in Morse units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pulse {
    pub on: bool,
    pub units: u8,
}

impl Pulse {
    const fn on(units: u8) -> Self {
        Self { on: true, units }
    }

    const fn off(units: u8) -> Self {
        Self { on: false, units }
    }
}

const DOT_UNITS: u8 = 1;
const DASH_UNITS: u8 = 3;
const ELEMENT_GAP_UNITS: u8 = 1;
const LETTER_GAP_EXTRA: u8 = 2;
const WORD_GAP_EXTRA: u8 = 6;

/// Pulse plan for a Morse string.
pub struct Pulses<'a> {
    bytes: &'a [u8],
    pos: usize,
    pending: Option<Pulse>,
}

/// Plan the pulses for `text`.
pub fn pulses(text: &str) -> Pulses<'_> {
    Pulses {
        bytes: text.as_bytes(),
        pos: 0,
        pending: None,
    }
}

impl Iterator for Pulses<'_> {
    type Item = Pulse;

    fn next(&mut self) -> Option<Pulse> {
        if let Some(p) = self.pending.take() {
            return Some(p);
        }

        loop {
            let byte = *self.bytes.get(self.pos)?;
            self.pos += 1;

            match byte {
                b'.' | b'-' => {
                    self.pending = Some(Pulse::off(ELEMENT_GAP_UNITS));
                    let units = if byte == b'.' { DOT_UNITS } else { DASH_UNITS };
                    return Some(Pulse::on(units));
                }
                b' ' => {
                    let mut run = 1;
                    while self.bytes.get(self.pos) == Some(&b' ') {
                        run += 1;
                        self.pos += 1;
                    }
                    let extra = if run >= 2 { WORD_GAP_EXTRA } else { LETTER_GAP_EXTRA };
                    return Some(Pulse::off(extra));
                }
                _ => continue,
            }
        }
    }
}

/// One note of the theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    pub freq_hz: u32,
    pub on_ms: u32,
    pub pause_ms: u32,
}

/// E5 G5 A5 C6 A5 G5 E5.
pub const THEME: [Note; 7] = [
    Note { freq_hz: 659, on_ms: 150, pause_ms: 50 },
    Note { freq_hz: 784, on_ms: 150, pause_ms: 50 },
    Note { freq_hz: 880, on_ms: 150, pause_ms: 100 },
    Note { freq_hz: 1046, on_ms: 200, pause_ms: 100 },
    Note { freq_hz: 880, on_ms: 150, pause_ms: 50 },
    Note { freq_hz: 784, on_ms: 150, pause_ms: 50 },
    Note { freq_hz: 659, on_ms: 300, pause_ms: 0 },
];

/// What the render task is asked to do.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderJob {
    Word(Word),
    Clear,
}

/// Owner of the output devices.
pub struct Renderer<O, D, R> {
    output: O,
    delay: D,
    rng: R,
}

impl<O, D, R> Renderer<O, D, R>
where
    O: SignalOutput,
    D: DelayNs,
    R: RandomSource,
{
    pub fn new(output: O, delay: D, rng: R) -> Self {
        Self { output, delay, rng }
    }

    /// Carry out one job.
    pub fn run(&mut self, job: RenderJob, config: &Config) {
        match job {
            RenderJob::Word(word) => self.render(&word, config),
            RenderJob::Clear => self.output.clear_text(),
        }
    }

    /// Show `word`, then key its dots and dashes.
    pub fn render(&mut self, word: &Word, config: &Config) {
        if self.roll_theme(config.theme_one_in()) {
            self.play_theme();
        }

        self.output.clear_text();
        self.output.show_text(word.as_str());
        log::info!("Morse word: {}", word);

        let unit_ms = u32::from(config.unit_ms());
        for pulse in pulses(word.as_str()) {
            let ms = u32::from(pulse.units) * unit_ms;
            if pulse.on {
                self.key(true);
                self.delay.delay_ms(ms);
                self.key(false);
            } else {
                self.delay.delay_ms(ms);
            }
        }
    }

    /// Play [`THEME`] on the sidetone.
    pub fn play_theme(&mut self) {
        for note in THEME {
            self.output.sound(Some(note.freq_hz));
            self.delay.delay_ms(note.on_ms);
            self.output.sound(None);
            if note.pause_ms > 0 {
                self.delay.delay_ms(note.pause_ms);
            }
        }
    }

    fn roll_theme(&mut self, one_in: u8) -> bool {
        one_in != 0 && self.rng.next_u32() % u32::from(one_in) == 0
    }

    fn key(&mut self, on: bool) {
        self.output.light(on);
        self.output.sound(on.then_some(SIDETONE_HZ));
    }

    /// Give the devices back (tests).
    pub fn into_parts(self) -> (O, D, R) {
        (self.output, self.delay, self.rng)
    }
}
