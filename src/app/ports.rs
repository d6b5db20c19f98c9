//! Port traits: the hexagonal boundary between the animation core and the
//! peripheral capability layer.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Animator / ModeController (domain)
//! ```
//!
//! Driven adapters (GPIO, timer, clock, event sinks) implement these traits.
//! The domain consumes them via generics or `dyn`, so the core never touches
//! hardware registers directly.
//!
//! ## Interrupt safety
//!
//! [`GpioPort::set_output_level`] and [`TimerPort::set_compare`] are called
//! from interrupt context.  Implementations MUST NOT block, allocate, or log
//! in those two methods.  All methods take `&self`: peripheral registers are
//! shared by nature, and implementors provide their own interior
//! mutability.

use core::fmt;

/// Board-level line identifier (GPIO number on the ESP32-S3).
pub type LineId = i32;

/// Interrupt handler installed on a timer channel.
pub type IsrHandler = fn();

/// Handle to a line configured as a digital output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputHandle(LineId);

impl OutputHandle {
    pub const fn new(line: LineId) -> Self {
        Self(line)
    }

    pub const fn line(self) -> LineId {
        self.0
    }
}

/// Handle to a line configured as a digital input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputHandle(LineId);

impl InputHandle {
    pub const fn new(line: LineId) -> Self {
        Self(line)
    }

    pub const fn line(self) -> LineId {
        self.0
    }
}

/// Handle to a configured periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u8);

impl TimerHandle {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }
}

/// Input bias resistor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullBias {
    None,
    Up,
    Down,
}

// ───────────────────────────────────────────────────────────────
// GPIO port
// ───────────────────────────────────────────────────────────────

/// Line-level digital I/O.
pub trait GpioPort: Sync {
    /// Configure `line` as a push-pull output, initially low.
    fn configure_digital_output(&self, line: LineId) -> Result<OutputHandle, PortError>;

    /// Drive an output line.  Interrupt-safe.
    fn set_output_level(&self, output: OutputHandle, high: bool);

    /// Configure `line` as a digital input with the given bias.
    fn configure_digital_input(&self, line: LineId, bias: PullBias)
    -> Result<InputHandle, PortError>;

    /// Sample an input line.  `true` = electrically high.
    fn read_input_level(&self, input: InputHandle) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Timer port
// ───────────────────────────────────────────────────────────────

/// Periodic timer with an overflow channel and one compare channel.
///
/// The counter runs from 0 to `period_ticks - 1`; the overflow channel fires
/// when it wraps, the compare channel when it reaches `compare_ticks`.
pub trait TimerPort: Sync {
    fn configure_periodic_timer(
        &self,
        period_ticks: u16,
        compare_ticks: u16,
    ) -> Result<TimerHandle, PortError>;

    fn register_overflow_handler(&self, timer: TimerHandle, handler: IsrHandler);

    fn register_compare_handler(&self, timer: TimerHandle, handler: IsrHandler);

    /// Rearm the compare channel.  Takes effect from the next period.
    /// Interrupt-safe.
    fn set_compare(&self, timer: TimerHandle, compare_ticks: u16);

    fn enable_timer(&self, timer: TimerHandle);

    fn disable_timer(&self, timer: TimerHandle);
}

/// Everything the animation needs from the board.
pub trait PeripheralPort: GpioPort + TimerPort {}

impl<T: GpioPort + TimerPort> PeripheralPort for T {}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock for main-loop timestamps.
pub trait TimePort {
    /// Milliseconds since boot, wrapping at `u32::MAX`.
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The main loop emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from peripheral configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// The line does not exist or is reserved.
    LineUnavailable(LineId),
    /// No free hardware timer.
    TimerUnavailable,
    /// Period/compare combination rejected by the hardware (rc attached).
    InvalidTimerConfig(i32),
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineUnavailable(line) => write!(f, "line {} unavailable", line),
            Self::TimerUnavailable => write!(f, "no timer available"),
            Self::InvalidTimerConfig(rc) => write!(f, "timer config rejected (rc={})", rc),
        }
    }
}
