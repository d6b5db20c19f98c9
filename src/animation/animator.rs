//! Interrupt-side half of the animation.
//!
//! [`Animator`] owns everything the two timer ISRs touch: the engine
//! writer, the rotation engine, the brightness modulator and the ring
//! output driver.  The main loop never sees it, so its resources need no
//! synchronisation beyond "one ISR at a time" (both ISRs share one priority
//! level and run to completion).

use super::brightness::BrightnessModulator;
use super::rotation::RotationEngine;
use super::state::{AnimationState, EngineWriter};
use crate::app::ports::{PeripheralPort, TimerHandle};
use crate::config::RingConfig;
use crate::drivers::ring_leds::RingLeds;

pub struct Animator<'a> {
    state: EngineWriter<'a>,
    rotation: RotationEngine,
    modulator: BrightnessModulator,
    leds: RingLeds,
    timer: TimerHandle,
}

impl<'a> Animator<'a> {
    /// Build the ISR side and reset the ring to its start position.
    pub fn new(
        state: EngineWriter<'a>,
        config: &RingConfig,
        leds: RingLeds,
        timer: TimerHandle,
    ) -> Self {
        let rotation = RotationEngine::new(config.ring_size, config.rotation_threshold);
        rotation.reset(&state);
        Self {
            state,
            rotation,
            modulator: BrightnessModulator::new(config.timer_period_ticks),
            leds,
            timer,
        }
    }

    /// Overflow ISR body.  Returns `true` when the lit position moved.
    pub fn on_overflow<P: PeripheralPort + ?Sized>(&mut self, port: &P) -> bool {
        let stepped = self.rotation.on_overflow(&self.state);
        self.modulator.begin_period(
            port,
            self.timer,
            &mut self.leds,
            self.state.mask(),
            self.state.color(),
            self.state.brightness(),
        );
        stepped
    }

    /// Compare ISR body.
    pub fn on_compare<P: PeripheralPort + ?Sized>(&mut self, port: &P) {
        self.modulator.on_compare(port, &mut self.leds);
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }
}
