//! Application service: start-up wiring and the main loop.
//!
//! [`start`] configures every line and the timer through the port traits,
//! installs the interrupt side into a critical-section slot and hands the
//! main-loop side back to the caller.  [`run`] is the firmware entry point:
//! it starts the animation on the global [`ANIMATION`] state and polls the
//! inputs forever.
//!
//! ```text
//!   PeripheralPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                      │ start(): lines, timer,   │
//!   TimePort ────────▶ │ ISR slot, ModeController │
//!                      └──────────────────────────┘
//! ```
//!
//! ## ISR slot
//!
//! The [`Animator`] lives in a `critical_section::Mutex<RefCell<..>>` that
//! only the two timer trampolines lock.  The main loop shares nothing with
//! them but the atomics in [`AnimationState`], so it never waits on an ISR
//! and an ISR never waits on it.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use log::{error, info};

use crate::animation::state::MAX_RING_SIZE;
use crate::animation::{AnimationState, Animator, ModeController, ModeInputs};
use crate::config::RingConfig;
use crate::drivers::ring_leds::RingLeds;
use crate::error::{Error, Result};
use crate::pins::PinMap;

use super::events::AppEvent;
use super::ports::{EventSink, OutputHandle, PeripheralPort, PullBias, TimePort};

/// The board's one animation state.
pub static ANIMATION: AnimationState = AnimationState::new(MAX_RING_SIZE);

struct IsrContext {
    animator: Animator<'static>,
    port: &'static dyn PeripheralPort,
}

static ISR_CONTEXT: Mutex<RefCell<Option<IsrContext>>> = Mutex::new(RefCell::new(None));

fn overflow_isr() {
    critical_section::with(|cs| {
        if let Some(ctx) = ISR_CONTEXT.borrow_ref_mut(cs).as_mut() {
            ctx.animator.on_overflow(ctx.port);
        }
    });
}

fn compare_isr() {
    critical_section::with(|cs| {
        if let Some(ctx) = ISR_CONTEXT.borrow_ref_mut(cs).as_mut() {
            ctx.animator.on_compare(ctx.port);
        }
    });
}

// ───────────────────────────────────────────────────────────────
// Start-up
// ───────────────────────────────────────────────────────────────

/// Configure the board, start the timer and return the main-loop half.
///
/// Fails with [`Error::AlreadyStarted`] if `state` was already split or the
/// ISR slot is taken; both can happen at most once per program.  The state
/// is split only after every line and the timer are configured, so a
/// peripheral failure reports its own cause and leaves `state` usable.
pub fn start<P: PeripheralPort>(
    port: &'static P,
    state: &'static AnimationState,
    config: &RingConfig,
    pins: &PinMap,
) -> Result<ModeController<'static>> {
    config.validate()?;
    if state.is_split() {
        return Err(Error::AlreadyStarted);
    }

    let ring = usize::from(config.ring_size);
    let positions = pins.ring[..ring]
        .iter()
        .map(|&line| port.configure_digital_output(line))
        .collect::<core::result::Result<heapless::Vec<OutputHandle, { MAX_RING_SIZE as usize }>, _>>()?;
    let colors = [
        port.configure_digital_output(pins.red)?,
        port.configure_digital_output(pins.green)?,
        port.configure_digital_output(pins.blue)?,
    ];
    let inputs = ModeInputs {
        brightness_button: port.configure_digital_input(pins.brightness_button, PullBias::Up)?,
        color_button: port.configure_digital_input(pins.color_button, PullBias::Up)?,
        speed_sw1: port.configure_digital_input(pins.speed_sw1, PullBias::Up)?,
        speed_sw2: port.configure_digital_input(pins.speed_sw2, PullBias::Up)?,
    };
    let leds = RingLeds::new(port, &positions, colors);

    let period = config.timer_period_ticks;
    let compare = state.brightness().compare_ticks(period);
    let timer = port.configure_periodic_timer(period, compare)?;
    let (engine, control) = state.split().ok_or(Error::AlreadyStarted)?;
    let animator = Animator::new(engine, config, leds, timer);

    critical_section::with(|cs| {
        let mut slot = ISR_CONTEXT.borrow_ref_mut(cs);
        if slot.is_some() {
            return Err(Error::AlreadyStarted);
        }
        *slot = Some(IsrContext { animator, port });
        Ok(())
    })?;

    port.register_overflow_handler(timer, overflow_isr);
    port.register_compare_handler(timer, compare_isr);
    port.enable_timer(timer);

    info!(
        "animation: ring={} period={} ticks @ {} Hz, step threshold={}",
        config.ring_size, period, config.timer_tick_hz, config.rotation_threshold
    );
    Ok(ModeController::new(control, inputs, config))
}

// ───────────────────────────────────────────────────────────────
// Main loop
// ───────────────────────────────────────────────────────────────

/// One main-loop iteration: poll the inputs, report status when due.
pub struct PollLoop<'a> {
    controller: ModeController<'a>,
    status_interval_ms: u32,
    last_status_ms: u32,
}

impl<'a> PollLoop<'a> {
    pub fn new(controller: ModeController<'a>, config: &RingConfig, now_ms: u32) -> Self {
        Self {
            controller,
            status_interval_ms: config.status_interval_ms,
            last_status_ms: now_ms,
        }
    }

    pub fn step<P, S>(&mut self, port: &P, now_ms: u32, sink: &mut S)
    where
        P: PeripheralPort + ?Sized,
        S: EventSink + ?Sized,
    {
        self.controller.poll(port, now_ms, sink);

        if now_ms.wrapping_sub(self.last_status_ms) >= self.status_interval_ms {
            self.last_status_ms = now_ms;
            sink.emit(&AppEvent::Status(self.controller.state().snapshot()));
        }
    }
}

/// Firmware entry point.  Starts the animation and never returns.
///
/// A start failure is a build-time mistake (bad config or pin map); it is
/// logged and the main task parks forever with the ring dark.
pub fn run<P, T, D, S>(port: &'static P, clock: &T, delay: &mut D, config: &RingConfig, sink: &mut S) -> !
where
    P: PeripheralPort,
    T: TimePort,
    D: DelayNs,
    S: EventSink,
{
    let controller = match start(port, &ANIMATION, config, &PinMap::board()) {
        Ok(controller) => controller,
        Err(e) => {
            error!("animation start failed ({}), halting", e);
            loop {
                delay.delay_ms(1000);
            }
        }
    };

    sink.emit(&AppEvent::Started(ANIMATION.snapshot()));
    info!("System ready. Entering poll loop.");

    let mut main_loop = PollLoop::new(controller, config, clock.now_ms());
    loop {
        main_loop.step(port, clock.now_ms(), sink);
        delay.delay_ms(config.poll_interval_ms);
    }
}
