//! Console line reader.
//!
//! Two byte sources, one line buffer each:
//!
//! - the local console, always read; lines are control commands or codec
//!   payload depending on `ProgramMode`,
//! - the peer link, read only while `PeerLink == On`; lines are finished
//!   words and go straight to rendering.
//!
//! The reader never renders itself. It returns a [`LineAction`] and the
//! caller forwards words to the render queue, which keeps the output
//! devices owned by a single task.

use core::fmt::Write;

use crate::console::{
    execute, parse_line, CommandContext, CommandEffect, Feed, LineBuffer, ParsedCommand,
};
use crate::control::{PeerLink, ProgramMode};
use crate::diagnostics::Counter;
use crate::morse;
use crate::peer::PeerReceiver;
use crate::word::Word;

/// Non-blocking byte input.
pub trait ByteSource {
    /// Next byte, or `None` if nothing is pending.
    fn read_byte(&mut self) -> Option<u8>;
}

/// What the caller must do with a completed line.
#[derive(Debug, PartialEq, Eq)]
pub enum LineAction {
    /// Send to the renderer.
    Render(Word),
    /// Ask the renderer to blank the display.
    ClearDisplay,
    /// Stop the program.
    Exit,
}

/// Per-source line assembly and dispatch.
#[derive(Default)]
pub struct LineReader {
    console: LineBuffer,
    peer: PeerReceiver,
}

impl LineReader {
    pub const fn new() -> Self {
        Self {
            console: LineBuffer::new(),
            peer: PeerReceiver::new(),
        }
    }

    /// Drain whatever both sources have pending.
    ///
    /// Each completed line is dispatched and its action handed to `act`.
    /// The peer source is left untouched while the peer link is off.
    pub fn poll<C, P>(
        &mut self,
        console: &mut C,
        peer: &mut P,
        ctx: &CommandContext<'_>,
        out: &mut dyn Write,
        mut act: impl FnMut(LineAction),
    ) where
        C: ByteSource + ?Sized,
        P: ByteSource + ?Sized,
    {
        while let Some(byte) = console.read_byte() {
            if let Some(action) = self.feed_console(byte, ctx, out) {
                act(action);
            }
        }

        if ctx.control.peer() == PeerLink::On {
            while let Some(byte) = peer.read_byte() {
                if let Some(word) = self.peer.feed(byte, ctx.diagnostics) {
                    log::info!("peer: {}", word);
                    act(LineAction::Render(word));
                }
            }
        }
    }

    /// Feed one console byte.
    pub fn feed_console(
        &mut self,
        byte: u8,
        ctx: &CommandContext<'_>,
        out: &mut dyn Write,
    ) -> Option<LineAction> {
        match self.console.feed(byte) {
            Feed::Pending => None,
            Feed::Overflow => {
                ctx.diagnostics.record(Counter::LineOverflows);
                log::warn!("console line overflow, discarded");
                None
            }
            Feed::Complete => {
                let replaced = self.console.repair_utf8();
                if replaced > 0 {
                    ctx.diagnostics.record(Counter::InvalidInput);
                    log::warn!("console: {} invalid byte(s) replaced", replaced);
                }
                let action = dispatch_console_line(self.console.as_str(), ctx, out);
                self.console.clear();
                action
            }
        }
    }
}

fn dispatch_console_line(
    line: &str,
    ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Option<LineAction> {
    if line.trim().is_empty() {
        return None;
    }

    if let Some(cmd) = parse_line(line) {
        return run_command(&cmd, ctx, out);
    }

    let mode = ctx.control.mode();
    let mut word = Word::new();
    let result = match mode {
        ProgramMode::Receiving => morse::encode(line, &mut word),
        ProgramMode::Decoding => morse::decode(line, &mut word),
        ProgramMode::Sending => {
            let _ = writeln!(out, "Sending mode: tilt to key, ':help' for commands");
            return None;
        }
    };

    if let Err(e) = result {
        ctx.diagnostics.record(Counter::WordOverflows);
        log::warn!("{}: {}", mode.as_str(), e);
        return None;
    }
    if word.is_empty() {
        return None;
    }

    match mode {
        ProgramMode::Decoding => {
            let _ = writeln!(out, "Decoded: {}", word);
        }
        _ => {
            let _ = writeln!(out, "Morse: {}", word);
        }
    }
    Some(LineAction::Render(word))
}

fn run_command(
    cmd: &ParsedCommand<'_>,
    ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Option<LineAction> {
    match execute(cmd, ctx, out) {
        Ok(CommandEffect::None) => None,
        Ok(CommandEffect::ClearDisplay) => Some(LineAction::ClearDisplay),
        Ok(CommandEffect::Exit) => Some(LineAction::Exit),
        Err(e) => {
            let _ = writeln!(out, "{}", e);
            None
        }
    }
}
