//! System configuration parameters
//!
//! All tunable parameters for the LED ring.  Defaults reproduce the lab
//! board: a 1 MHz timer with a 1 ms period and a 250-overflow rotation step.
//! The configuration is validated exactly once, when the animation starts.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::animation::state::{BrightnessLevel, MAX_RING_SIZE, RotationPeriod};

/// Timer counter rate of the board build (1 µs per tick).
pub const DEFAULT_TIMER_TICK_HZ: u32 = 1_000_000;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfig {
    // --- Ring ---
    /// Number of LED positions on the ring (1-16)
    pub ring_size: u8,

    // --- Timer ---
    /// Timer counter rate (Hz)
    pub timer_tick_hz: u32,
    /// Counter ticks per period; the overflow interrupt fires once per period
    pub timer_period_ticks: u16,

    // --- Rotation ---
    /// Overflows the accumulator must exceed at the fastest speed
    pub rotation_threshold: u16,

    // --- Inputs ---
    /// Window after a detected press during which that button is ignored (ms)
    pub settle_ms: u32,
    /// Main-loop sleep between input polls (ms)
    pub poll_interval_ms: u32,

    // --- Telemetry ---
    /// Status report interval (ms)
    pub status_interval_ms: u32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            ring_size: MAX_RING_SIZE,

            timer_tick_hz: DEFAULT_TIMER_TICK_HZ,
            timer_period_ticks: 1000, // 1 kHz overflow

            rotation_threshold: 250, // ~251 ms per step at the fastest speed

            settle_ms: 300,
            poll_interval_ms: 5,

            status_interval_ms: 10_000,
        }
    }
}

impl RingConfig {
    /// Reject configurations that would break an animation invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ring_size == 0 || self.ring_size > MAX_RING_SIZE {
            return Err(ConfigError::ValidationFailed("ring_size must be 1-16"));
        }
        if self.timer_tick_hz == 0 {
            return Err(ConfigError::ValidationFailed("timer_tick_hz must be non-zero"));
        }
        if self.timer_period_ticks < 4 {
            return Err(ConfigError::ValidationFailed("timer_period_ticks must be at least 4"));
        }
        for level in BrightnessLevel::ALL {
            let compare = level.compare_ticks(self.timer_period_ticks);
            if compare == 0 || compare >= self.timer_period_ticks {
                return Err(ConfigError::ValidationFailed(
                    "brightness threshold must lie strictly inside the timer period",
                ));
            }
        }
        // The accumulator saturates at u16::MAX, so the slowest threshold
        // must stay below it or the ring never advances.
        if u32::from(self.rotation_threshold) * RotationPeriod::Slowest.divisor()
            / RotationPeriod::Fastest.divisor()
            >= u32::from(u16::MAX)
        {
            return Err(ConfigError::ValidationFailed("rotation_threshold too large"));
        }
        let thresholds = RotationPeriod::ALL.map(|p| p.threshold(self.rotation_threshold));
        if thresholds[0] == 0 || thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::ValidationFailed(
                "rotation thresholds must be non-zero and distinct per speed",
            ));
        }
        if self.settle_ms == 0 || self.poll_interval_ms == 0 || self.status_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        if self.poll_interval_ms >= self.settle_ms {
            return Err(ConfigError::ValidationFailed(
                "poll_interval_ms must be shorter than settle_ms",
            ));
        }
        Ok(())
    }

    /// Wall-clock duration of one rotation step at `period`, in microseconds.
    pub fn step_period_us(&self, period: RotationPeriod) -> u64 {
        let overflows = u64::from(period.threshold(self.rotation_threshold)) + 1;
        overflows * u64::from(self.timer_period_ticks) * 1_000_000 / u64::from(self.timer_tick_hz)
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
