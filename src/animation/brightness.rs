//! Brightness modulator: software duty cycle on top of the timer.
//!
//! ```text
//!   counter  0 ─────────── compare ─────────── period
//!   output   ON  (overflow ISR)   OFF (compare ISR)
//! ```
//!
//! The overflow ISR lights the ring at the start of each period and rearms
//! the compare channel; the compare ISR blanks it.  Duty cycle is
//! `compare / period`.  Because every threshold lies strictly inside the
//! period, the overflow always runs first and the ring is always off again
//! before the next overflow.

use super::state::{BrightnessLevel, Color, PositionMask};
use crate::app::ports::{PeripheralPort, TimerHandle};
use crate::drivers::ring_leds::RingLeds;

pub struct BrightnessModulator {
    period_ticks: u16,
}

impl BrightnessModulator {
    pub fn new(period_ticks: u16) -> Self {
        Self { period_ticks }
    }

    pub fn compare_ticks(&self, level: BrightnessLevel) -> u16 {
        level.compare_ticks(self.period_ticks)
    }

    /// Overflow half: light `mask` in `color` and arm the compare channel
    /// for `level`.
    pub fn begin_period<P: PeripheralPort + ?Sized>(
        &self,
        port: &P,
        timer: TimerHandle,
        leds: &mut RingLeds,
        mask: PositionMask,
        color: Color,
        level: BrightnessLevel,
    ) {
        leds.show(port, mask, color);
        port.set_compare(timer, self.compare_ticks(level));
    }

    /// Compare half: force the ring off until the next overflow.
    pub fn on_compare<P: PeripheralPort + ?Sized>(&self, port: &P, leds: &mut RingLeds) {
        leds.blank(port);
    }
}
