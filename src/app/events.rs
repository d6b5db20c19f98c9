//! Structured events emitted by the main loop through
//! [`EventSink`](super::ports::EventSink).

use crate::animation::state::{BrightnessLevel, Color, RotationPeriod, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Timer running, controller about to poll for the first time.
    Started(Snapshot),
    /// SB2 press applied.
    ColorChanged(Color),
    /// SB1 press applied; carries the new compare threshold in ticks.
    BrightnessChanged { level: BrightnessLevel, compare_ticks: u16 },
    /// Speed selector moved.
    SpeedChanged { period: RotationPeriod, threshold: u16 },
    /// Periodic status report.
    Status(Snapshot),
}
