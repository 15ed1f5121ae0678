//! Control line parser
//!
//! A control line is `:` followed by a command name and up to two
//! whitespace-separated arguments. Anything else is payload.

/// Prefix that marks a console line as a control line.
pub const CONTROL_PREFIX: char = ':';

/// Parsed control line with up to 2 arguments
#[derive(Debug, Clone)]
pub struct ParsedCommand<'a> {
    /// The command name, without the prefix
    pub command: &'a str,
    /// Up to 2 arguments
    pub args: [Option<&'a str>; 2],
}

impl<'a> ParsedCommand<'a> {
    /// Get argument by index (0-based)
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.args.get(idx).copied().flatten()
    }
}

/// Whether `line` is a control line.
pub fn is_control_line(line: &str) -> bool {
    line.trim_start().starts_with(CONTROL_PREFIX)
}

/// Parse a control line into command and arguments.
///
/// Returns `None` for payload lines.
pub fn parse_line(line: &str) -> Option<ParsedCommand<'_>> {
    let body = line.trim_start().strip_prefix(CONTROL_PREFIX)?;
    let mut parts = body.split_whitespace();

    let command = parts.next().unwrap_or("");

    let mut args = [None, None];
    for (i, arg) in parts.take(2).enumerate() {
        args[i] = Some(arg);
    }

    Some(ParsedCommand { command, args })
}
