//! Bounded, owned text buffer passed between pipeline stages.
//!
//! A `Word` is built by exactly one task and then moved, never shared: the
//! aggregator or line reader fills it, hands it to the render queue or the
//! peer link, and starts over with a fresh one.

use core::fmt;

use crate::config::WORD_CAPACITY;

/// A push would have exceeded `WORD_CAPACITY`; the buffer was reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordOverflow;

impl fmt::Display for WordOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "word exceeds {} bytes, discarded", WORD_CAPACITY)
    }
}

/// Bounded text buffer. Overflow resets it to empty.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Word {
    text: heapless::String<WORD_CAPACITY>,
}

impl Word {
    pub const fn new() -> Self {
        Self {
            text: heapless::String::new(),
        }
    }

    /// Copy `s` into a new word.
    pub fn from_text(s: &str) -> Result<Self, WordOverflow> {
        let mut word = Self::new();
        word.push_str(s)?;
        Ok(word)
    }

    /// Append one character.
    pub fn push(&mut self, c: char) -> Result<(), WordOverflow> {
        if self.text.push(c).is_err() {
            self.text.clear();
            return Err(WordOverflow);
        }
        Ok(())
    }

    /// Append a string; all or nothing, then reset on overflow.
    pub fn push_str(&mut self, s: &str) -> Result<(), WordOverflow> {
        if self.text.push_str(s).is_err() {
            self.text.clear();
            return Err(WordOverflow);
        }
        Ok(())
    }

    /// Move the contents out, leaving this buffer empty.
    #[inline]
    pub fn take(&mut self) -> Word {
        core::mem::take(self)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.text.clear();
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of trailing ASCII spaces.
    pub fn trailing_spaces(&self) -> usize {
        self.as_bytes().iter().rev().take_while(|&&b| b == b' ').count()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_take() {
        let mut word = Word::new();
        word.push('.').unwrap();
        word.push_str("-.").unwrap();
        assert_eq!(word.as_str(), ".-.");

        let taken = word.take();
        assert_eq!(taken.as_str(), ".-.");
        assert!(word.is_empty());
    }

    #[test]
    fn test_overflow_resets() {
        let mut word = Word::new();
        for _ in 0..WORD_CAPACITY {
            word.push('-').unwrap();
        }
        assert_eq!(word.len(), WORD_CAPACITY);

        assert_eq!(word.push('.'), Err(WordOverflow));
        assert!(word.is_empty());

        // The buffer is usable again right away
        word.push('.').unwrap();
        assert_eq!(word.as_str(), ".");
    }

    #[test]
    fn test_push_str_overflow_is_all_or_nothing() {
        let mut word = Word::new();
        word.push_str(&"-".repeat(WORD_CAPACITY - 1)).unwrap();
        assert_eq!(word.push_str(".."), Err(WordOverflow));
        assert!(word.is_empty());
    }

    #[test]
    fn test_trailing_spaces() {
        assert_eq!(Word::from_text("... ").unwrap().trailing_spaces(), 1);
        assert_eq!(Word::from_text(".  ").unwrap().trailing_spaces(), 2);
        assert_eq!(Word::new().trailing_spaces(), 0);
    }
}
