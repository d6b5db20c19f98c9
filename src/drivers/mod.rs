//! Line-level drivers and ESP-IDF peripheral helpers.

pub mod button;
pub mod ring_leds;
pub mod timer_claim;

#[cfg(target_os = "espidf")]
pub mod hw_init;
#[cfg(target_os = "espidf")]
pub mod hw_timer;
