//! Console errors, printed as `Exx: text`

use core::fmt;
use core::num::{IntErrorKind, ParseIntError};

use crate::config::OutOfRange;

/// Why a control line was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// `:name` is not in the command table
    UnknownCommand,
    /// Argument is not a number or keyword the command knows
    InvalidValue,
    /// Command needs an argument
    MissingArg,
    /// Number parsed but is outside the accepted range
    OutOfRange,
}

impl ConsoleError {
    fn parts(self) -> (&'static str, &'static str) {
        match self {
            Self::UnknownCommand => ("E01", "unknown command"),
            Self::InvalidValue => ("E02", "invalid value"),
            Self::MissingArg => ("E03", "missing argument"),
            Self::OutOfRange => ("E04", "out of range"),
        }
    }

    /// Stable code, e.g. `E01`
    pub fn code(&self) -> &'static str {
        self.parts().0
    }

    pub fn message(&self) -> &'static str {
        self.parts().1
    }
}

/// A number too large for the target type is out of range, not invalid.
impl From<ParseIntError> for ConsoleError {
    fn from(e: ParseIntError) -> Self {
        match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Self::OutOfRange,
            _ => Self::InvalidValue,
        }
    }
}

impl From<OutOfRange> for ConsoleError {
    fn from(_: OutOfRange) -> Self {
        Self::OutOfRange
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (code, message) = self.parts();
        write!(f, "{}: {}", code, message)
    }
}
