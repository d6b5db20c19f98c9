//! Polled button debouncer with a settle window.
//!
//! ## Hardware
//!
//! Active-low momentary switch with internal pull-up.  The main loop samples
//! the line every poll and feeds the level into [`SettleDebouncer::poll`].
//!
//! ## Behaviour
//!
//! A pressed sample while the button is idle is a press: it is reported
//! once and opens a settle window of `settle_ms`.  Samples inside the window
//! are ignored, which swallows contact bounce.  No "pressed" latch survives
//! the window: a button still held when the window closes reports another
//! press, so holding a button auto-repeats at the settle rate.
//!
//! Timestamps are wrapping `u32` milliseconds.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Settling { since_ms: u32 },
}

pub struct SettleDebouncer {
    settle_ms: u32,
    state: DebounceState,
}

impl SettleDebouncer {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            settle_ms,
            state: DebounceState::Idle,
        }
    }

    /// Feed one sample.  Returns `true` when the sample counts as a press.
    pub fn poll(&mut self, now_ms: u32, pressed: bool) -> bool {
        if let DebounceState::Settling { since_ms } = self.state {
            if now_ms.wrapping_sub(since_ms) < self.settle_ms {
                return false;
            }
            self.state = DebounceState::Idle;
        }

        if pressed {
            self.state = DebounceState::Settling { since_ms: now_ms };
        }
        pressed
    }

    /// True while samples are being ignored.
    pub fn is_settling(&self) -> bool {
        matches!(self.state, DebounceState::Settling { .. })
    }
}
