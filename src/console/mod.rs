//! Local console: control commands and line assembly
//!
//! Zero heap allocation - all fixed buffers.

pub mod commands;
pub mod error;
pub mod line_buffer;
pub mod parser;

pub use commands::{execute, print_banner, CommandContext, CommandEffect, COMMANDS, VERSION};
pub use error::ConsoleError;
pub use line_buffer::{Feed, LineBuffer};
pub use parser::{is_control_line, parse_line, ParsedCommand};
