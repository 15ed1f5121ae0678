//! Escape markers inside codec input.
//!
//! Text between a pair of `%%` markers bypasses the codec and is copied
//! through unchanged. An opening marker without a closing one makes the
//! rest of the line verbatim.
//!
//! ```text
//! "SOS %%(ok)%% HI"  →  Codec("SOS ")  Verbatim("(ok)")  Codec(" HI")
//! ```

/// Escape marker.
pub const MARKER: &str = "%%";

/// A piece of an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
    /// Run through the encoder or decoder.
    Codec(&'a str),
    /// Copy unchanged.
    Verbatim(&'a str),
}

/// Iterator over the spans of a line. Empty spans are skipped.
#[derive(Debug, Clone)]
pub struct Spans<'a> {
    rest: &'a str,
    verbatim: bool,
}

/// Split `line` at escape markers.
pub fn spans(line: &str) -> Spans<'_> {
    Spans {
        rest: line,
        verbatim: false,
    }
}

impl<'a> Iterator for Spans<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Span<'a>> {
        while !self.rest.is_empty() {
            let (text, rest) = match self.rest.find(MARKER) {
                Some(at) => (&self.rest[..at], &self.rest[at + MARKER.len()..]),
                None => (self.rest, ""),
            };
            let verbatim = self.verbatim;
            let crossed_marker = rest.len() + text.len() < self.rest.len();
            self.rest = rest;
            if crossed_marker {
                self.verbatim = !verbatim;
            }

            if !text.is_empty() {
                return Some(if verbatim {
                    Span::Verbatim(text)
                } else {
                    Span::Codec(text)
                });
            }
        }
        None
    }
}
