//! Rotation engine: runs in the timer overflow ISR.
//!
//! Each overflow bumps the tick accumulator.  Once it exceeds the active
//! speed's threshold the accumulator restarts at zero and the lit position
//! moves one step right, wrapping from D1 back to the start position.

use super::state::{EngineWriter, PositionMask};

pub struct RotationEngine {
    ring_size: u8,
    base_threshold: u16,
}

impl RotationEngine {
    pub fn new(ring_size: u8, base_threshold: u16) -> Self {
        Self {
            ring_size,
            base_threshold,
        }
    }

    /// Mask the ring starts from and wraps back to.
    pub fn start_mask(&self) -> PositionMask {
        PositionMask::start(self.ring_size)
    }

    /// Put the writer's fields at the power-on position.
    pub fn reset(&self, state: &EngineWriter<'_>) {
        state.set_ticks(0);
        state.set_mask(self.start_mask());
    }

    /// Account for one overflow.  Returns `true` when the position advanced.
    pub fn on_overflow(&self, state: &EngineWriter<'_>) -> bool {
        let ticks = state.ticks().saturating_add(1);
        if ticks > state.speed().threshold(self.base_threshold) {
            state.set_ticks(0);
            state.set_mask(state.mask().advance(self.ring_size));
            true
        } else {
            state.set_ticks(ticks);
            false
        }
    }
}
