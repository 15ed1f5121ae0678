//! Morse codec.
//!
//! Table-driven, both directions. Text goes in one line at a time and comes
//! out as a Morse stream where one space separates letters and two spaces
//! separate words:
//!
//! ```text
//! encode("SOS HI")  →  "... --- ...  .... .. "
//! decode("... --- ...  .... .. ")  →  "SOS HI"
//! ```
//!
//! Both directions honour `%%` escape spans (see [`crate::escape`]).
//! Unmappable input never fails: unknown characters are skipped when
//! encoding and unknown codes decode to [`UNKNOWN`]. The only error is
//! running out of room in the output [`Word`].

use crate::escape::{self, Span};
use crate::word::{Word, WordOverflow};

/// Decoded in place of a code that is not in the table.
pub const UNKNOWN: char = '?';

/// Longest code in the table (`$`).
pub const MAX_CODE_LEN: usize = 7;

/// (character, code) pairs. Letters are stored upper case.
pub static MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"), ('B', "-..."), ('C', "-.-."), ('D', "-.."), ('E', "."),
    ('F', "..-."), ('G', "--."), ('H', "...."), ('I', ".."), ('J', ".---"),
    ('K', "-.-"), ('L', ".-.."), ('M', "--"), ('N', "-."), ('O', "---"),
    ('P', ".--."), ('Q', "--.-"), ('R', ".-."), ('S', "..."), ('T', "-"),
    ('U', "..-"), ('V', "...-"), ('W', ".--"), ('X', "-..-"), ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"), ('1', ".----"), ('2', "..---"), ('3', "...--"), ('4', "....-"),
    ('5', "....."), ('6', "-...."), ('7', "--..."), ('8', "---.."), ('9', "----."),
    (',', "--..--"), ('?', "..--.."), ('!', "-.-.--"), ('\'', ".----."),
    ('/', "-..-."), ('(', "-.--."), (')', "-.--.-"), ('&', ".-..."), (':', "---..."),
    (';', "-.-.-."), ('=', "-...-"), ('+', ".-.-."), ('_', "..--.-"),
    ('"', ".-..-."), ('$', "...-..-"), ('@', ".--.-."),
];

/// Code for one character, case-insensitive.
pub fn code_for(c: char) -> Option<&'static str> {
    let c = c.to_ascii_uppercase();
    MORSE_TABLE
        .iter()
        .find(|(ch, _)| *ch == c)
        .map(|(_, code)| *code)
}

/// Character for one code, or [`UNKNOWN`].
pub fn char_for(code: &str) -> char {
    if code.len() > MAX_CODE_LEN {
        return UNKNOWN;
    }
    MORSE_TABLE
        .iter()
        .find(|(_, c)| *c == code)
        .map_or(UNKNOWN, |(ch, _)| *ch)
}

/// Encode one line of text into `out`.
///
/// On overflow `out` is left empty.
pub fn encode(line: &str, out: &mut Word) -> Result<(), WordOverflow> {
    for span in escape::spans(line) {
        match span {
            Span::Codec(text) => encode_text(text, out)?,
            Span::Verbatim(text) => out.push_str(text)?,
        }
    }
    Ok(())
}

fn encode_text(text: &str, out: &mut Word) -> Result<(), WordOverflow> {
    for c in text.chars() {
        if c.is_whitespace() {
            // Word gap: widen the trailing run to two, never more.
            if out.is_empty() {
                continue;
            }
            for _ in out.trailing_spaces()..2 {
                out.push(' ')?;
            }
        } else if let Some(code) = code_for(c) {
            out.push_str(code)?;
            out.push(' ')?;
        }
    }
    Ok(())
}

/// Decode a Morse stream into `out`.
///
/// Verbatim spans count as items for word separation, so a run of two or
/// more spaces next to one still becomes a single space.
///
/// On overflow `out` is left empty.
pub fn decode(stream: &str, out: &mut Word) -> Result<(), WordOverflow> {
    let mut gaps = WordGaps::default();
    for span in escape::spans(stream) {
        match span {
            Span::Codec(text) => {
                for (i, token) in text.split(' ').enumerate() {
                    if i > 0 {
                        gaps.space();
                    }
                    if !token.is_empty() {
                        gaps.separate(out)?;
                        out.push(char_for(token))?;
                    }
                }
            }
            Span::Verbatim(text) => {
                gaps.separate(out)?;
                out.push_str(text)?;
            }
        }
    }
    Ok(())
}

/// Space run between decoded items, carried across escape spans.
#[derive(Default)]
struct WordGaps {
    seen_item: bool,
    run: usize,
}

impl WordGaps {
    fn space(&mut self) {
        self.run += 1;
    }

    /// Called before each item; emits the word separator if one is due.
    fn separate(&mut self, out: &mut Word) -> Result<(), WordOverflow> {
        if self.seen_item && self.run >= 2 {
            out.push(' ')?;
        }
        self.seen_item = true;
        self.run = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_one_to_one() {
        for (i, (ch, code)) in MORSE_TABLE.iter().enumerate() {
            for (other_ch, other_code) in &MORSE_TABLE[i + 1..] {
                assert_ne!(ch, other_ch);
                assert_ne!(code, other_code);
            }
            assert!(code.len() <= MAX_CODE_LEN);
        }
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(code_for('s'), Some("..."));
        assert_eq!(code_for('S'), Some("..."));
        assert_eq!(code_for('.'), None);
        assert_eq!(code_for('é'), None);
    }

    #[test]
    fn test_word_gap_next_to_verbatim_span() {
        let mut out = Word::new();
        decode("...  %%x%%  ---", &mut out).unwrap();
        assert_eq!(out.as_str(), "S x O");

        let mut out = Word::new();
        decode("...%%x%% ---", &mut out).unwrap();
        assert_eq!(out.as_str(), "SxO");
    }

    #[test]
    fn test_char_for_unknown() {
        assert_eq!(char_for("..."), 'S');
        assert_eq!(char_for("......."), UNKNOWN);
        assert_eq!(char_for("-.-.-.-.-"), UNKNOWN);
        assert_eq!(char_for("abc"), UNKNOWN);
    }
}
