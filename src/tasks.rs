//! Task bodies.
//!
//! Each task is a `step` (one iteration, host-testable) and a `run` loop.
//! `main` only picks priorities and stacks and hands in the platform pieces.
//!
//! ```text
//! priority  task          blocks on
//! ────────  ────────────  ───────────────────────────────
//!    5      sampler       sample period, bounded queue send
//!    4      line reader   poll period
//!    3      aggregator    symbol queue receive
//!    3      renderer      render queue receive, element delays
//! ```

use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use crate::aggregator::{Accept, Aggregator, Flush};
use crate::config::{Config, LINE_POLL_MS, SAMPLE_PERIOD_MS, SYMBOL_SEND_TIMEOUT_MS};
use crate::console::CommandContext;
use crate::control::ControlState;
use crate::diagnostics::{Counter, Diagnostics};
use crate::line_reader::{ByteSource, LineAction, LineReader};
use crate::peer;
use crate::queue::{publish, SymbolReceiver, SymbolSender};
use crate::render::{RandomSource, RenderJob, Renderer, SignalOutput};
use crate::sampler::{OrientationSensor, Sample, TiltSampler};

/// Non-blocking producer side of the render queue.
pub trait RenderSink {
    /// Queue a job; gives it back if the queue is full.
    fn try_submit(&self, job: RenderJob) -> Result<(), RenderJob>;
}

/// Receiving side of the render queue.
pub trait RenderSource {
    /// Block for the next job; `None` once every producer is gone.
    fn next_job(&self) -> Option<RenderJob>;
}

/// Submit without waiting; a busy renderer drops and counts the job.
pub fn submit<S: RenderSink + ?Sized>(sink: &S, job: RenderJob, diagnostics: &Diagnostics) {
    if let Err(job) = sink.try_submit(job) {
        diagnostics.record(Counter::RenderDrops);
        match job {
            RenderJob::Word(word) => log::warn!("renderer busy, dropped '{}'", word),
            RenderJob::Clear => log::warn!("renderer busy, dropped clear"),
        }
    }
}

// --- Sampler ---

/// One sampling period: read, classify, publish.
pub fn sampler_step<S, Q>(
    sampler: &TiltSampler,
    sensor: &mut S,
    queue: &Q,
    control: &ControlState,
    diagnostics: &Diagnostics,
) -> Sample
where
    S: OrientationSensor,
    Q: SymbolSender + ?Sized,
{
    let sample = sampler.sample(sensor, control.snapshot());
    match sample {
        Sample::Symbol { pitch_deg, symbol } => {
            log::debug!("pitch {:.1} → '{}'", pitch_deg, symbol.as_char());
            publish(queue, symbol, SYMBOL_SEND_TIMEOUT_MS, diagnostics);
        }
        Sample::SensorFault => diagnostics.record(Counter::SensorFaults),
        Sample::Idle => {}
    }
    sample
}

/// Sampler loop: fixed cadence regardless of mode.
pub fn run_sampler<S, Q, D>(
    sensor: &mut S,
    queue: &Q,
    delay: &mut D,
    control: &ControlState,
    diagnostics: &Diagnostics,
) -> !
where
    S: OrientationSensor,
    Q: SymbolSender + ?Sized,
    D: DelayNs,
{
    let sampler = TiltSampler::new(crate::config::TILT_THRESHOLD_DEG);
    loop {
        sampler_step(&sampler, sensor, queue, control, diagnostics);
        delay.delay_ms(SAMPLE_PERIOD_MS);
    }
}

// --- Aggregator ---

/// What one aggregator iteration did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Routed {
    Ignored,
    Appended,
    EmptyGap,
    Overflow,
    /// Word sent to the render queue (or dropped there).
    Rendered,
    /// Word written to the peer link (or lost there).
    Transmitted,
}

/// Block for one symbol and route any finished word.
pub fn aggregator_step<Q, W, S>(
    aggregator: &mut Aggregator,
    queue: &Q,
    peer_tx: &mut W,
    render: &S,
    control: &ControlState,
    diagnostics: &Diagnostics,
) -> Routed
where
    Q: SymbolReceiver + ?Sized,
    W: embedded_io::Write,
    S: RenderSink + ?Sized,
{
    let symbol = queue.recv();
    match aggregator.accept(symbol, control, diagnostics) {
        Accept::Ignored => Routed::Ignored,
        Accept::Appended => Routed::Appended,
        Accept::EmptyGap => Routed::EmptyGap,
        Accept::Overflow => Routed::Overflow,
        Accept::Flushed(Flush::Render(word)) => {
            submit(render, RenderJob::Word(word), diagnostics);
            Routed::Rendered
        }
        Accept::Flushed(Flush::Transmit(word)) => {
            log::info!("peer tx: {}", word);
            peer::transmit_best_effort(peer_tx, &word, diagnostics);
            Routed::Transmitted
        }
    }
}

/// Aggregator loop: parks on the symbol queue.
pub fn run_aggregator<Q, W, S>(
    queue: &Q,
    peer_tx: &mut W,
    render: &S,
    control: &ControlState,
    diagnostics: &Diagnostics,
) -> !
where
    Q: SymbolReceiver + ?Sized,
    W: embedded_io::Write,
    S: RenderSink + ?Sized,
{
    let mut aggregator = Aggregator::new();
    loop {
        aggregator_step(&mut aggregator, queue, peer_tx, render, control, diagnostics);
    }
}

// --- Line reader ---

/// Drain pending input once.
///
/// Returns `true` when `:exit` was entered.
pub fn line_reader_step<C, P, S>(
    reader: &mut LineReader,
    console: &mut C,
    peer: &mut P,
    out: &mut dyn Write,
    render: &S,
    ctx: &CommandContext<'_>,
) -> bool
where
    C: ByteSource + ?Sized,
    P: ByteSource + ?Sized,
    S: RenderSink + ?Sized,
{
    let mut exit = false;
    reader.poll(console, peer, ctx, out, |action| match action {
        LineAction::Render(word) => submit(render, RenderJob::Word(word), ctx.diagnostics),
        LineAction::ClearDisplay => submit(render, RenderJob::Clear, ctx.diagnostics),
        LineAction::Exit => exit = true,
    });
    exit
}

/// Line reader loop; returns only on `:exit`.
pub fn run_line_reader<C, P, S, D>(
    console: &mut C,
    peer: &mut P,
    out: &mut dyn Write,
    render: &S,
    delay: &mut D,
    ctx: &CommandContext<'_>,
) where
    C: ByteSource + ?Sized,
    P: ByteSource + ?Sized,
    S: RenderSink + ?Sized,
    D: DelayNs,
{
    let mut reader = LineReader::new();
    loop {
        if line_reader_step(&mut reader, console, peer, out, render, ctx) {
            log::info!("exit requested from console");
            return;
        }
        delay.delay_ms(LINE_POLL_MS);
    }
}

// --- Renderer ---

/// Renderer loop; returns when every producer has hung up.
pub fn run_renderer<O, D, R, J>(renderer: &mut Renderer<O, D, R>, jobs: &J, config: &Config)
where
    O: SignalOutput,
    D: DelayNs,
    R: RandomSource,
    J: RenderSource + ?Sized,
{
    while let Some(job) = jobs.next_job() {
        renderer.run(job, config);
    }
    log::warn!("render queue closed");
}
