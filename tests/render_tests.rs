//! Renderer tests: display, light and sidetone timing

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use rust_tilt_morse::config::{Config, SIDETONE_HZ};
use rust_tilt_morse::render::{RandomSource, RenderJob, Renderer, SignalOutput, THEME};
use rust_tilt_morse::Word;

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Light(bool),
    Sound(Option<u32>),
    Show(String),
    Clear,
    Delay(u32),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct RecordingOutput(Log);

impl SignalOutput for RecordingOutput {
    fn light(&mut self, on: bool) {
        self.0.borrow_mut().push(Event::Light(on));
    }

    fn sound(&mut self, freq_hz: Option<u32>) {
        self.0.borrow_mut().push(Event::Sound(freq_hz));
    }

    fn show_text(&mut self, text: &str) {
        self.0.borrow_mut().push(Event::Show(text.to_string()));
    }

    fn clear_text(&mut self) {
        self.0.borrow_mut().push(Event::Clear);
    }
}

struct RecordingDelay(Log);

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Event::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(Event::Delay(ms));
    }
}

struct FixedRandom(u32);

impl RandomSource for FixedRandom {
    fn next_u32(&mut self) -> u32 {
        self.0
    }
}

fn renderer(roll: u32) -> (Renderer<RecordingOutput, RecordingDelay, FixedRandom>, Log) {
    let log: Log = Rc::default();
    let r = Renderer::new(
        RecordingOutput(Rc::clone(&log)),
        RecordingDelay(Rc::clone(&log)),
        FixedRandom(roll),
    );
    (r, log)
}

fn config(unit_ms: u16, theme_one_in: u8) -> Config {
    let config = Config::new();
    config.set_unit_ms(unit_ms).unwrap();
    config.set_theme_one_in(theme_one_in);
    config
}

/// Durations the light was on, in order.
fn keyed(events: &[Event]) -> Vec<u32> {
    let mut out = Vec::new();
    let mut on: Option<u32> = None;
    for e in events {
        match e {
            Event::Light(true) => on = Some(0),
            Event::Light(false) => out.extend(on.take()),
            Event::Delay(ms) => {
                if let Some(t) = on.as_mut() {
                    *t += ms;
                }
            }
            _ => {}
        }
    }
    out
}

fn total_delay(events: &[Event]) -> u32 {
    events
        .iter()
        .map(|e| match e {
            Event::Delay(ms) => *ms,
            _ => 0,
        })
        .sum()
}

#[test]
fn test_sos_keys_three_short_three_long_three_short() {
    let (mut r, log) = renderer(1);
    let word = Word::from_text("... --- ... ").unwrap();

    r.render(&word, &config(20, 0));

    let events = log.borrow();
    assert_eq!(keyed(&events), vec![20, 20, 20, 60, 60, 60, 20, 20, 20]);
    // 3 x 2 + 2 + 3 x 4 + 2 + 3 x 2 + 2 units
    assert_eq!(total_delay(&events), 30 * 20);
}

#[test]
fn test_display_shows_word_before_keying() {
    let (mut r, log) = renderer(1);
    let word = Word::from_text(".-").unwrap();

    r.render(&word, &config(20, 0));

    let events = log.borrow();
    assert_eq!(events[0], Event::Clear);
    assert_eq!(events[1], Event::Show(".-".to_string()));
    assert_eq!(events[2], Event::Light(true));
    assert_eq!(events[3], Event::Sound(Some(SIDETONE_HZ)));
}

#[test]
fn test_light_and_tone_end_together() {
    let (mut r, log) = renderer(1);
    r.render(&Word::from_text("-").unwrap(), &config(20, 0));

    let events = log.borrow();
    let off = events.iter().position(|e| *e == Event::Light(false)).unwrap();
    assert_eq!(events[off + 1], Event::Sound(None));
}

#[test]
fn test_word_gap_is_seven_units() {
    let (mut r, log) = renderer(1);
    r.render(&Word::from_text(".  .").unwrap(), &config(20, 0));

    // dot 1 + gap 1 + word gap 6 + dot 1 + gap 1
    assert_eq!(total_delay(&log.borrow()), 10 * 20);
}

#[test]
fn test_decoded_text_is_shown_not_keyed() {
    let (mut r, log) = renderer(1);
    r.render(&Word::from_text("SOS").unwrap(), &config(20, 0));

    let events = log.borrow();
    assert!(events.contains(&Event::Show("SOS".to_string())));
    assert!(keyed(&events).is_empty());
    assert_eq!(total_delay(&events), 0);
}

#[test]
fn test_theme_plays_on_winning_roll() {
    let (mut r, log) = renderer(12);
    r.render(&Word::from_text(".").unwrap(), &config(20, 6));

    let events = log.borrow();
    assert_eq!(events[0], Event::Sound(Some(THEME[0].freq_hz)));
    let tones = events
        .iter()
        .filter(|e| matches!(e, Event::Sound(Some(hz)) if *hz != SIDETONE_HZ))
        .count();
    assert_eq!(tones, THEME.len());
}

#[test]
fn test_theme_skipped_on_losing_roll_or_off() {
    let (mut r, log) = renderer(13);
    r.render(&Word::from_text(".").unwrap(), &config(20, 6));
    assert_eq!(log.borrow()[0], Event::Clear);

    let (mut r, log) = renderer(0);
    r.render(&Word::from_text(".").unwrap(), &config(20, 0));
    assert_eq!(log.borrow()[0], Event::Clear);
}

#[test]
fn test_unit_change_applies_to_next_word() {
    let (mut r, log) = renderer(1);
    let config = config(20, 0);
    let dot = Word::from_text(".").unwrap();

    r.render(&dot, &config);
    config.set_unit_ms(50).unwrap();
    r.render(&dot, &config);

    assert_eq!(keyed(&log.borrow()), vec![20, 50]);
}

#[test]
fn test_clear_job() {
    let (mut r, log) = renderer(1);
    r.run(RenderJob::Clear, &config(20, 0));
    assert_eq!(*log.borrow(), vec![Event::Clear]);
}
