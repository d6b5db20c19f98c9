//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements           | Connects to              |
//! |------------|----------------------|--------------------------|
//! | `hardware` | GpioPort, TimerPort  | ESP32-S3 GPIO, GPTimer   |
//! | `log_sink` | EventSink            | Serial log output        |
//! | `time`     | TimePort             | ESP32 system timer       |

#[cfg(target_os = "espidf")]
pub mod hardware;
pub mod log_sink;
pub mod time;
