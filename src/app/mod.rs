//! Application layer: port traits, events and the start-up/main-loop
//! service.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping the animation fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
