//! Hardware adapter: bridges the ESP32-S3 GPIO matrix and a GPTimer to
//! the peripheral port traits.
//!
//! This is the only module that hands raw peripherals to the animation.
//! It holds no state of its own: the GPIO registers and the timer statics
//! in [`hw_timer`] are the state, so a `static` instance is enough.

use crate::app::ports::{
    GpioPort, InputHandle, IsrHandler, LineId, OutputHandle, PortError, PullBias, TimerHandle,
    TimerPort,
};
use crate::drivers::{hw_init, hw_timer};

/// Concrete adapter for the board's peripherals.
pub struct EspPeripherals {
    tick_hz: u32,
}

impl EspPeripherals {
    /// `tick_hz` is the GPTimer resolution; it must match
    /// [`RingConfig::timer_tick_hz`](crate::config::RingConfig::timer_tick_hz).
    pub const fn new(tick_hz: u32) -> Self {
        Self { tick_hz }
    }
}

// ── GpioPort implementation ───────────────────────────────────

impl GpioPort for EspPeripherals {
    fn configure_digital_output(&self, line: LineId) -> Result<OutputHandle, PortError> {
        hw_init::configure_output(line)?;
        Ok(OutputHandle::new(line))
    }

    fn set_output_level(&self, output: OutputHandle, high: bool) {
        hw_init::gpio_write(output.line(), high);
    }

    fn configure_digital_input(&self, line: LineId, bias: PullBias) -> Result<InputHandle, PortError> {
        hw_init::configure_input(line, bias)?;
        Ok(InputHandle::new(line))
    }

    fn read_input_level(&self, input: InputHandle) -> bool {
        hw_init::gpio_read(input.line())
    }
}

// ── TimerPort implementation ──────────────────────────────────

impl TimerPort for EspPeripherals {
    fn configure_periodic_timer(
        &self,
        period_ticks: u16,
        compare_ticks: u16,
    ) -> Result<TimerHandle, PortError> {
        hw_timer::configure(self.tick_hz, period_ticks, compare_ticks)
    }

    fn register_overflow_handler(&self, timer: TimerHandle, handler: IsrHandler) {
        hw_timer::register_overflow(timer, handler);
    }

    fn register_compare_handler(&self, timer: TimerHandle, handler: IsrHandler) {
        hw_timer::register_compare(timer, handler);
    }

    fn set_compare(&self, timer: TimerHandle, compare_ticks: u16) {
        hw_timer::set_compare(timer, compare_ticks);
    }

    fn enable_timer(&self, timer: TimerHandle) {
        hw_timer::enable(timer);
    }

    fn disable_timer(&self, timer: TimerHandle) {
        hw_timer::disable(timer);
    }
}
