//! Command handlers

use core::fmt::Write;

use super::parser::ParsedCommand;
use super::ConsoleError;
use crate::config::{Config, UNIT_MS_MAX, UNIT_MS_MIN};
use crate::control::ControlState;
use crate::diagnostics::Diagnostics;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Shared state a command may read or change.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub control: &'a ControlState,
    pub diagnostics: &'a Diagnostics,
    pub config: &'a Config,
}

/// Side effect the caller must carry out after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    None,
    /// Blank the display.
    ClearDisplay,
    /// Stop the program (restart on the device).
    Exit,
}

type Handler =
    fn(&ParsedCommand<'_>, &CommandContext<'_>, &mut dyn Write) -> Result<CommandEffect, ConsoleError>;

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub brief: &'static str,
    pub handler: Handler,
}

/// All available commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "clear", brief: "Clear the display", handler: cmd_clear },
    CommandDescriptor { name: "exit", brief: "Stop (restarts the device)", handler: cmd_exit },
    CommandDescriptor { name: "help", brief: "List commands", handler: cmd_help },
    CommandDescriptor { name: "status", brief: "Mode, capture gate, peer link", handler: cmd_status },
    CommandDescriptor { name: "stats", brief: "Diagnostics counters [reset]", handler: cmd_stats },
    CommandDescriptor { name: "theme", brief: "Theme odds 1-in-<n>, or 'off'", handler: cmd_theme },
    CommandDescriptor { name: "unit", brief: "Show or set Morse unit [ms]", handler: cmd_unit },
];

/// Execute a parsed command
pub fn execute(
    cmd: &ParsedCommand<'_>,
    ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<CommandEffect, ConsoleError> {
    let handler = COMMANDS
        .iter()
        .find(|c| c.name == cmd.command)
        .ok_or(ConsoleError::UnknownCommand)?;

    (handler.handler)(cmd, ctx, out)
}

/// Print welcome banner
pub fn print_banner(out: &mut dyn Write) {
    let _ = writeln!(out, "\r\n{}", VERSION);
    let _ = writeln!(out, "Type ':help' for commands.\r");
}

// --- Command Implementations ---

fn cmd_clear(
    _cmd: &ParsedCommand<'_>,
    _ctx: &CommandContext<'_>,
    _out: &mut dyn Write,
) -> Result<CommandEffect, ConsoleError> {
    Ok(CommandEffect::ClearDisplay)
}

fn cmd_exit(
    _cmd: &ParsedCommand<'_>,
    _ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<CommandEffect, ConsoleError> {
    let _ = writeln!(out, "Exiting...");
    Ok(CommandEffect::Exit)
}

fn cmd_help(
    cmd: &ParsedCommand<'_>,
    _ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<CommandEffect, ConsoleError> {
    if let Some(name) = cmd.arg(0) {
        let name = name.trim_start_matches(':');
        let c = COMMANDS
            .iter()
            .find(|c| c.name == name)
            .ok_or(ConsoleError::UnknownCommand)?;
        let _ = writeln!(out, ":{}: {}", c.name, c.brief);
    } else {
        for c in COMMANDS {
            let _ = writeln!(out, "  :{:<8} {}", c.name, c.brief);
        }
        let _ = writeln!(out, "Other lines: encoded (Receiving) or decoded (Decoding).");
        let _ = writeln!(out, "Text between %% markers passes through unchanged.");
    }
    Ok(CommandEffect::None)
}

fn cmd_status(
    _cmd: &ParsedCommand<'_>,
    ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<CommandEffect, ConsoleError> {
    let snap = ctx.control.snapshot();
    let _ = writeln!(out, "{}", VERSION);
    let _ = writeln!(out, "mode: {}", snap.mode.as_str());
    let _ = writeln!(out, "state: {:?}", snap.state);
    let _ = writeln!(out, "peer: {:?}", snap.peer);
    let _ = writeln!(out, "unit: {}ms", ctx.config.unit_ms());
    Ok(CommandEffect::None)
}

fn cmd_stats(
    cmd: &ParsedCommand<'_>,
    ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<CommandEffect, ConsoleError> {
    match cmd.arg(0) {
        None => {}
        Some("reset") => {
            ctx.diagnostics.reset();
            let _ = writeln!(out, "stats reset");
            return Ok(CommandEffect::None);
        }
        Some(_) => return Err(ConsoleError::InvalidValue),
    }

    let s = ctx.diagnostics.snapshot();
    let _ = writeln!(out, "symbols sent:    {}", s.symbols_sent);
    let _ = writeln!(out, "symbols dropped: {}", s.symbols_dropped);
    let _ = writeln!(out, "sensor faults:   {}", s.sensor_faults);
    let _ = writeln!(out, "line overflows:  {}", s.line_overflows);
    let _ = writeln!(out, "word overflows:  {}", s.word_overflows);
    let _ = writeln!(out, "render drops:    {}", s.render_drops);
    let _ = writeln!(out, "peer tx fails:   {}", s.peer_tx_failures);
    let _ = writeln!(out, "invalid input:   {}", s.invalid_input);
    Ok(CommandEffect::None)
}

fn cmd_unit(
    cmd: &ParsedCommand<'_>,
    ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<CommandEffect, ConsoleError> {
    if let Some(value) = cmd.arg(0) {
        ctx.config.set_unit_ms(value.parse()?)?;
    }
    let _ = writeln!(
        out,
        "unit={}ms ({}..={})",
        ctx.config.unit_ms(),
        UNIT_MS_MIN,
        UNIT_MS_MAX
    );
    Ok(CommandEffect::None)
}

fn cmd_theme(
    cmd: &ParsedCommand<'_>,
    ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<CommandEffect, ConsoleError> {
    let value = cmd.arg(0).ok_or(ConsoleError::MissingArg)?;
    let one_in: u8 = match value {
        "off" => 0,
        v => v.parse()?,
    };
    ctx.config.set_theme_one_in(one_in);
    let _ = match one_in {
        0 => writeln!(out, "theme=off"),
        n => writeln!(out, "theme=1/{}", n),
    };
    Ok(CommandEffect::None)
}
