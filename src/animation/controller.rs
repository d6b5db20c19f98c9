//! Mode controller: the main-loop half of the animation.
//!
//! Every poll samples all four inputs once:
//!
//! | Input | Kind              | Effect                                   |
//! |-------|-------------------|------------------------------------------|
//! | SB1   | momentary, settle | next brightness level                    |
//! | SB2   | momentary, settle | next color                               |
//! | SW1   | level             | speed selector, read every poll          |
//! | SW2   | level             | speed selector, read every poll          |
//!
//! SB1/SB2 go through a [`SettleDebouncer`] each; the selector lines are
//! combinational and bypass debouncing entirely.  The controller is the
//! only writer of color, brightness and speed.

use log::debug;

use super::state::{AnimationState, ControlWriter, RotationPeriod};
use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, GpioPort, InputHandle};
use crate::config::RingConfig;
use crate::drivers::button::SettleDebouncer;

/// The four configured input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInputs {
    pub brightness_button: InputHandle,
    pub color_button: InputHandle,
    pub speed_sw1: InputHandle,
    pub speed_sw2: InputHandle,
}

pub struct ModeController<'a> {
    state: ControlWriter<'a>,
    inputs: ModeInputs,
    brightness_button: SettleDebouncer,
    color_button: SettleDebouncer,
    period_ticks: u16,
    rotation_threshold: u16,
}

impl<'a> ModeController<'a> {
    pub fn new(state: ControlWriter<'a>, inputs: ModeInputs, config: &RingConfig) -> Self {
        Self {
            state,
            inputs,
            brightness_button: SettleDebouncer::new(config.settle_ms),
            color_button: SettleDebouncer::new(config.settle_ms),
            period_ticks: config.timer_period_ticks,
            rotation_threshold: config.rotation_threshold,
        }
    }

    /// Sample the inputs once and apply whatever they ask for.
    pub fn poll<P, S>(&mut self, port: &P, now_ms: u32, sink: &mut S)
    where
        P: GpioPort + ?Sized,
        S: EventSink + ?Sized,
    {
        // Active-low: a pressed button pulls its line to ground.
        let sb1_pressed = !port.read_input_level(self.inputs.brightness_button);
        let sb2_pressed = !port.read_input_level(self.inputs.color_button);
        let sw1_high = port.read_input_level(self.inputs.speed_sw1);
        let sw2_high = port.read_input_level(self.inputs.speed_sw2);

        if self.brightness_button.poll(now_ms, sb1_pressed) {
            let level = self.state.brightness().next();
            self.state.set_brightness(level);
            debug!("SB1 press at {}ms → brightness {}", now_ms, level);
            sink.emit(&AppEvent::BrightnessChanged {
                level,
                compare_ticks: level.compare_ticks(self.period_ticks),
            });
        }

        if self.color_button.poll(now_ms, sb2_pressed) {
            let color = self.state.color().next();
            self.state.set_color(color);
            debug!("SB2 press at {}ms → color {}", now_ms, color);
            sink.emit(&AppEvent::ColorChanged(color));
        }

        let period = RotationPeriod::from_switches(sw1_high, sw2_high);
        if period != self.state.speed() {
            self.state.set_speed(period);
            sink.emit(&AppEvent::SpeedChanged {
                period,
                threshold: period.threshold(self.rotation_threshold),
            });
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }
}
