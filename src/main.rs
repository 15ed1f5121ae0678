//! RustTiltMorse - Main entry point
//!
//! 1. Initialize logging, sensor, queues, UARTs, outputs
//! 2. Attach button interrupts
//! 3. Spawn sampler, line reader, aggregator and renderer
//! 4. Supervise: drain the interrupt log, re-arm the buttons

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    device::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!(
        "{}: firmware image, build for xtensa-esp32s3-espidf",
        rust_tilt_morse::console::VERSION
    );
    std::process::exit(1);
}

#[cfg(target_os = "espidf")]
mod device {
    use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
    use std::sync::Arc;
    use std::thread;

    use anyhow::{anyhow, Context};
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::{AnyIOPin, InterruptType, OutputPin, PinDriver, Pull};
    use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_svc::hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::reset;
    use esp_idf_svc::hal::task::thread::ThreadSpawnConfiguration;
    use esp_idf_svc::hal::uart::{config::Config as UartConfig, UartDriver};
    use esp_idf_svc::log::EspLogger;
    use esp_idf_svc::sys;

    use rust_tilt_morse::config::{board, DEBOUNCE_MS, RENDER_QUEUE_CAPACITY, SYMBOL_QUEUE_CAPACITY};
    use rust_tilt_morse::console::{print_banner, CommandContext};
    use rust_tilt_morse::hal::esp::{
        now_ms, ConsoleWriter, EspRandom, EspSignalOutput, PeerTx, SymbolQueue, UartByteSource,
    };
    use rust_tilt_morse::hal::{Icm42670, ICM42670_ADDR};
    use rust_tilt_morse::logging::drain_to_log;
    use rust_tilt_morse::render::{RenderJob, Renderer};
    use rust_tilt_morse::tasks::{self, RenderSink, RenderSource};
    use rust_tilt_morse::{
        rt_debug, rt_info, Button, ControlState, Debouncer, Diagnostics, CONFIG, LOG_STREAM,
    };

    // Static allocations: shared by interrupts and every task
    static CONTROL: ControlState = ControlState::new();
    static DEBOUNCER: Debouncer = Debouncer::new(DEBOUNCE_MS);
    static DIAGNOSTICS: Diagnostics = Diagnostics::new();

    /// Producer end of the render queue.
    #[derive(Clone)]
    struct RenderTx(SyncSender<RenderJob>);

    impl RenderSink for RenderTx {
        fn try_submit(&self, job: RenderJob) -> Result<(), RenderJob> {
            self.0.try_send(job).map_err(|e| match e {
                TrySendError::Full(job) | TrySendError::Disconnected(job) => job,
            })
        }
    }

    /// Consumer end of the render queue.
    struct RenderRx(Receiver<RenderJob>);

    impl RenderSource for RenderRx {
        fn next_job(&self) -> Option<RenderJob> {
            self.0.recv().ok()
        }
    }

    /// Button edge interrupt: debounce, transition, log. Nothing else.
    fn on_button_edge(button: Button) {
        let now = now_ms();
        match CONTROL.on_button_edge(&DEBOUNCER, button, now) {
            Some(transition) => rt_info!(LOG_STREAM, now, "{}", transition.message()),
            None => rt_debug!(LOG_STREAM, now, "button {:?} bounce ignored", button),
        }
    }

    /// Spawn a std thread with a FreeRTOS priority.
    fn spawn<F>(name: &str, priority: u8, stack_size: usize, f: F) -> anyhow::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        ThreadSpawnConfiguration {
            priority,
            stack_size,
            ..Default::default()
        }
        .set()
        .with_context(|| format!("thread config for {}", name))?;

        thread::Builder::new()
            .name(name.into())
            .stack_size(stack_size)
            .spawn(f)
            .with_context(|| format!("spawn {}", name))?;

        ThreadSpawnConfiguration::default()
            .set()
            .context("restore thread config")?;
        Ok(())
    }

    pub fn run() -> anyhow::Result<()> {
        sys::link_patches();
        EspLogger::initialize_default();
        log::info!("{}", rust_tilt_morse::console::VERSION);

        let p = Peripherals::take()?;

        // --- Motion sensor (fatal if missing) ---
        let i2c = I2cDriver::new(
            p.i2c0,
            p.pins.gpio10,
            p.pins.gpio8,
            &I2cConfig::new().baudrate(Hertz(board::I2C_BAUD_HZ)),
        )?;
        let mut sensor = Icm42670::new(i2c, ICM42670_ADDR);
        if let Err(e) = sensor.init() {
            log::error!("motion sensor init failed: {}", e);
            return Err(anyhow!("motion sensor: {}", e));
        }
        log::info!("[INIT] ICM-42670 OK");

        // --- Queues ---
        let symbols = Arc::new(SymbolQueue::new(SYMBOL_QUEUE_CAPACITY));
        let (render_tx, render_rx) = mpsc::sync_channel::<RenderJob>(RENDER_QUEUE_CAPACITY);
        let render_tx = RenderTx(render_tx);

        // --- UARTs ---
        let console = UartDriver::new(
            p.uart0,
            p.pins.gpio43,
            p.pins.gpio44,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &UartConfig::default().baudrate(Hertz(board::CONSOLE_BAUD)),
        )?;
        let (console_tx, console_rx) = console.into_split();
        let mut console_out = ConsoleWriter::new(console_tx);
        let console_in = UartByteSource::new(console_rx);

        let peer = UartDriver::new(
            p.uart1,
            p.pins.gpio17,
            p.pins.gpio18,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &UartConfig::default().baudrate(Hertz(board::PEER_BAUD)),
        )?;
        let (peer_tx, peer_rx) = peer.into_split();
        let peer_tx = PeerTx::new(peer_tx);
        let peer_in = UartByteSource::new(peer_rx);
        log::info!("[INIT] UART OK");

        // --- Outputs ---
        let led = PinDriver::output(p.pins.gpio2.downgrade_output())?;
        let timer = LedcTimerDriver::new(
            p.ledc.timer0,
            &TimerConfig::new()
                .frequency(2.kHz().into())
                .resolution(Resolution::Bits10),
        )?;
        let buzzer = LedcDriver::new(p.ledc.channel0, timer, p.pins.gpio4)?;
        let output = EspSignalOutput::new(led, buzzer, sys::ledc_timer_t_LEDC_TIMER_0);

        // --- Buttons ---
        let mut button_a = PinDriver::input(p.pins.gpio0)?;
        button_a.set_pull(Pull::Up)?;
        button_a.set_interrupt_type(InterruptType::NegEdge)?;
        let mut button_b = PinDriver::input(p.pins.gpio14)?;
        button_b.set_pull(Pull::Up)?;
        button_b.set_interrupt_type(InterruptType::NegEdge)?;

        // SAFETY: the callbacks only touch atomics and the lock-free log ring
        unsafe {
            button_a.subscribe(|| on_button_edge(Button::A))?;
            button_b.subscribe(|| on_button_edge(Button::B))?;
        }
        button_a.enable_interrupt()?;
        button_b.enable_interrupt()?;
        log::info!("[INIT] buttons OK");

        // --- Tasks ---
        {
            let symbols = Arc::clone(&symbols);
            spawn("sampler", board::SAMPLER_PRIORITY, board::SAMPLER_STACK, move || {
                tasks::run_sampler(&mut sensor, &*symbols, &mut FreeRtos, &CONTROL, &DIAGNOSTICS)
            })?;
        }

        {
            let render = render_tx.clone();
            spawn(
                "line_reader",
                board::LINE_READER_PRIORITY,
                board::WORD_TASK_STACK,
                move || {
                    let ctx = CommandContext {
                        control: &CONTROL,
                        diagnostics: &DIAGNOSTICS,
                        config: &CONFIG,
                    };
                    let mut console_in = console_in;
                    let mut peer_in = peer_in;
                    print_banner(&mut console_out);
                    tasks::run_line_reader(
                        &mut console_in,
                        &mut peer_in,
                        &mut console_out,
                        &render,
                        &mut FreeRtos,
                        &ctx,
                    );
                    log::warn!("restarting");
                    reset::restart();
                },
            )?;
        }

        {
            let render = render_tx;
            let mut peer_tx = peer_tx;
            spawn(
                "aggregator",
                board::AGGREGATOR_PRIORITY,
                board::WORD_TASK_STACK,
                move || tasks::run_aggregator(&*symbols, &mut peer_tx, &render, &CONTROL, &DIAGNOSTICS),
            )?;
        }

        spawn("renderer", board::RENDERER_PRIORITY, board::WORD_TASK_STACK, move || {
            let mut renderer = Renderer::new(output, FreeRtos, EspRandom);
            tasks::run_renderer(&mut renderer, &RenderRx(render_rx), &CONFIG);
        })?;

        log::info!("[INIT] tasks running, mode {}", CONTROL.mode().as_str());

        // --- Supervisor ---
        loop {
            drain_to_log(&LOG_STREAM);
            // Edge interrupts disarm themselves after firing
            button_a.enable_interrupt()?;
            button_b.enable_interrupt()?;
            FreeRtos::delay_ms(board::SUPERVISOR_PERIOD_MS);
        }
    }
}
