//! LED-ring animation firmware library.
//!
//! Exposes the animation core, the port traits and the host-testable
//! drivers for integration testing. All ESP-IDF-specific code is guarded
//! by `#[cfg(target_os = "espidf")]`.

#![deny(unused_must_use)]

pub mod animation;
pub mod app;
pub mod config;
pub mod error;
pub mod pins;

pub mod adapters;
pub mod drivers;
