//! LED-ring firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │  EspPeripherals     LogEventSink     Esp32TimeAdapter    │
//! │  (Gpio+Timer)       (EventSink)      (TimePort)          │
//! │                                                          │
//! │  ───────────────── Port Trait Boundary ────────────────  │
//! │                                                          │
//! │   timer ISRs: Animator (rotation · brightness)           │
//! │   main loop:  ModeController (buttons · speed switches)  │
//! └──────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::info;

use ledring::adapters::hardware::EspPeripherals;
use ledring::adapters::log_sink::LogEventSink;
use ledring::adapters::time::Esp32TimeAdapter;
use ledring::app::service;
use ledring::config::{DEFAULT_TIMER_TICK_HZ, RingConfig};

static PERIPHERALS: EspPeripherals = EspPeripherals::new(DEFAULT_TIMER_TICK_HZ);

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LedRing v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = RingConfig::default();
    let clock = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();

    service::run(&PERIPHERALS, &clock, &mut FreeRtos, &config, &mut sink)
}
