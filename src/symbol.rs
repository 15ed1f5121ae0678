//! The three symbols a tilt sample can produce.

/// One classified tilt sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Symbol {
    /// Tilted away past the negative threshold.
    Dot = b'.',
    /// Tilted past the positive threshold.
    Dash = b'-',
    /// Level; terminates the current word.
    Gap = b' ',
}

impl Symbol {
    /// Character used for this symbol in Morse text.
    #[inline]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }

    #[inline]
    pub const fn is_gap(self) -> bool {
        matches!(self, Symbol::Gap)
    }
}
