//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::info;

use crate::animation::state::Snapshot;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn log_snapshot(tag: &str, s: &Snapshot) {
    info!(
        "{} | mask=0x{:04x} pos=D{} ticks={} | color={} brightness={} speed={:?}",
        tag,
        s.mask.bits(),
        s.mask.position() + 1,
        s.ticks,
        s.color,
        s.brightness,
        s.speed,
    );
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(snapshot) => log_snapshot("START", snapshot),
            AppEvent::Status(snapshot) => log_snapshot("STATUS", snapshot),
            AppEvent::ColorChanged(color) => {
                info!("COLOR | -> {}", color);
            }
            AppEvent::BrightnessChanged { level, compare_ticks } => {
                info!("BRIGHT | -> {} (compare={} ticks)", level, compare_ticks);
            }
            AppEvent::SpeedChanged { period, threshold } => {
                info!("SPEED | -> {:?} (threshold={} overflows)", period, threshold);
            }
        }
    }
}
