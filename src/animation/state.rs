//! Shared animation state.
//!
//! One [`AnimationState`] is shared by the timer interrupts and the main
//! loop.  Every field is an atomic so either context can read without a
//! lock; writes go through exactly one writer per field:
//!
//! | Field        | Writer                      | Context          |
//! |--------------|-----------------------------|------------------|
//! | `mask`       | [`EngineWriter`]            | overflow ISR     |
//! | `ticks`      | [`EngineWriter`]            | overflow ISR     |
//! | `color`      | [`ControlWriter`]           | main loop        |
//! | `brightness` | [`ControlWriter`]           | main loop        |
//! | `speed`      | [`ControlWriter`]           | main loop        |
//!
//! [`AnimationState::split`] hands out the two writers once.  Relaxed
//! ordering suffices: the target is single-core and each field is
//! independent.

use core::fmt;
use core::ops::Deref;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};

use serde::{Deserialize, Serialize};

/// Maximum ring size supported by the `u16` mask.
pub const MAX_RING_SIZE: u8 = 16;

// ───────────────────────────────────────────────────────────────
// Position mask
// ───────────────────────────────────────────────────────────────

/// Bitfield of lit ring positions.  Bit `i` is position D(i+1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionMask(u16);

impl PositionMask {
    /// Leftmost LED of a ring of `ring_size` positions.
    pub const fn start(ring_size: u8) -> Self {
        Self(1 << (ring_size - 1))
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Index of the lowest lit position.
    pub const fn position(self) -> u32 {
        self.0.trailing_zeros()
    }

    /// One step to the right.  Shifting past D1 reseeds the start position
    /// instead of producing an empty mask.
    pub const fn advance(self, ring_size: u8) -> Self {
        let next = self.0 >> 1;
        if next == 0 { Self::start(ring_size) } else { Self(next) }
    }
}

impl fmt::Debug for PositionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PositionMask({:#06x})", self.0)
    }
}

// ───────────────────────────────────────────────────────────────
// Color
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Color {
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Next color in the SB2 cycle.
    pub const fn next(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    const fn from_raw(raw: u8) -> Self {
        // Only `as u8` values are ever stored.
        match raw {
            0 => Self::Red,
            1 => Self::Green,
            _ => Self::Blue,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Brightness
// ───────────────────────────────────────────────────────────────

/// Discrete duty-cycle presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BrightnessLevel {
    Full = 0,
    ThreeQuarter = 1,
    Half = 2,
    Quarter = 3,
}

impl BrightnessLevel {
    pub const ALL: [Self; 4] = [Self::Full, Self::ThreeQuarter, Self::Half, Self::Quarter];

    /// Next level in the SB1 cycle.
    pub const fn next(self) -> Self {
        match self {
            Self::Full => Self::ThreeQuarter,
            Self::ThreeQuarter => Self::Half,
            Self::Half => Self::Quarter,
            Self::Quarter => Self::Full,
        }
    }

    pub const fn percent(self) -> u8 {
        match self {
            Self::Full => 100,
            Self::ThreeQuarter => 75,
            Self::Half => 50,
            Self::Quarter => 25,
        }
    }

    /// Compare threshold for a timer of `period_ticks`.
    ///
    /// `Full` maps to `period - 1` so the output is still forced off before
    /// the next overflow.
    pub const fn compare_ticks(self, period_ticks: u16) -> u16 {
        match self {
            Self::Full => period_ticks.saturating_sub(1),
            level => (period_ticks as u32 * level.percent() as u32 / 100) as u16,
        }
    }

    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Full,
            1 => Self::ThreeQuarter,
            2 => Self::Half,
            _ => Self::Quarter,
        }
    }
}

impl fmt::Display for BrightnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

// ───────────────────────────────────────────────────────────────
// Rotation period
// ───────────────────────────────────────────────────────────────

/// Rotation speed chosen by the SW1/SW2 selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RotationPeriod {
    Fastest = 0,
    Fast = 1,
    Slow = 2,
    Slowest = 3,
}

impl RotationPeriod {
    pub const ALL: [Self; 4] = [Self::Fastest, Self::Fast, Self::Slow, Self::Slowest];

    /// Decode the selector.  Lines are pulled up, so an open switch reads
    /// high and both-open selects the fastest speed.
    pub const fn from_switches(sw1_high: bool, sw2_high: bool) -> Self {
        match (sw1_high, sw2_high) {
            (true, true) => Self::Fastest,
            (false, true) => Self::Fast,
            (true, false) => Self::Slow,
            (false, false) => Self::Slowest,
        }
    }

    /// Clock divisor relative to the timer input clock.
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Fastest => 3,
            Self::Fast => 5,
            Self::Slow => 7,
            Self::Slowest => 9,
        }
    }

    /// Overflow count the accumulator must exceed before the ring advances,
    /// scaled from the fastest speed's `base` threshold.  Saturates at
    /// `u16::MAX`; configuration validation rejects bases that would.
    pub const fn threshold(self, base: u16) -> u16 {
        let scaled = base as u32 * self.divisor() / Self::Fastest.divisor();
        if scaled > u16::MAX as u32 { u16::MAX } else { scaled as u16 }
    }

    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Fastest,
            1 => Self::Fast,
            2 => Self::Slow,
            _ => Self::Slowest,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Shared state
// ───────────────────────────────────────────────────────────────

/// Point-in-time copy of every shared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub mask: PositionMask,
    pub ticks: u16,
    pub color: Color,
    pub brightness: BrightnessLevel,
    pub speed: RotationPeriod,
}

/// Process-wide animation state.  Create once, never torn down.
pub struct AnimationState {
    mask: AtomicU16,
    ticks: AtomicU16,
    color: AtomicU8,
    brightness: AtomicU8,
    speed: AtomicU8,
    split: AtomicBool,
}

impl AnimationState {
    /// Start mask for `ring_size`, red, full brightness, fastest speed.
    pub const fn new(ring_size: u8) -> Self {
        Self {
            mask: AtomicU16::new(PositionMask::start(ring_size).bits()),
            ticks: AtomicU16::new(0),
            color: AtomicU8::new(Color::Red as u8),
            brightness: AtomicU8::new(BrightnessLevel::Full as u8),
            speed: AtomicU8::new(RotationPeriod::Fastest as u8),
            split: AtomicBool::new(false),
        }
    }

    /// Hand out the two writers.  Returns `None` on every call after the
    /// first, so each field keeps a single writer for the state's lifetime.
    pub fn split(&self) -> Option<(EngineWriter<'_>, ControlWriter<'_>)> {
        if self.split.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some((EngineWriter { state: self }, ControlWriter { state: self }))
    }

    /// True once [`split`](Self::split) has handed out the writers.
    pub fn is_split(&self) -> bool {
        self.split.load(Ordering::Acquire)
    }

    pub fn mask(&self) -> PositionMask {
        PositionMask(self.mask.load(Ordering::Relaxed))
    }

    pub fn ticks(&self) -> u16 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn color(&self) -> Color {
        Color::from_raw(self.color.load(Ordering::Relaxed))
    }

    pub fn brightness(&self) -> BrightnessLevel {
        BrightnessLevel::from_raw(self.brightness.load(Ordering::Relaxed))
    }

    pub fn speed(&self) -> RotationPeriod {
        RotationPeriod::from_raw(self.speed.load(Ordering::Relaxed))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mask: self.mask(),
            ticks: self.ticks(),
            color: self.color(),
            brightness: self.brightness(),
            speed: self.speed(),
        }
    }
}

/// Sole writer of `mask` and `ticks`.  Lives in the overflow ISR.
pub struct EngineWriter<'a> {
    state: &'a AnimationState,
}

impl EngineWriter<'_> {
    pub fn set_mask(&self, mask: PositionMask) {
        self.state.mask.store(mask.bits(), Ordering::Relaxed);
    }

    pub fn set_ticks(&self, ticks: u16) {
        self.state.ticks.store(ticks, Ordering::Relaxed);
    }
}

impl Deref for EngineWriter<'_> {
    type Target = AnimationState;

    fn deref(&self) -> &AnimationState {
        self.state
    }
}

/// Sole writer of `color`, `brightness` and `speed`.  Lives in the main loop.
pub struct ControlWriter<'a> {
    state: &'a AnimationState,
}

impl ControlWriter<'_> {
    pub fn set_color(&self, color: Color) {
        self.state.color.store(color as u8, Ordering::Relaxed);
    }

    pub fn set_brightness(&self, level: BrightnessLevel) {
        self.state.brightness.store(level as u8, Ordering::Relaxed);
    }

    pub fn set_speed(&self, speed: RotationPeriod) {
        self.state.speed.store(speed as u8, Ordering::Relaxed);
    }
}

impl Deref for ControlWriter<'_> {
    type Target = AnimationState;

    fn deref(&self) -> &AnimationState {
        self.state
    }
}
