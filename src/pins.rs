//! GPIO pin assignments for the LED ring board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

use crate::app::ports::LineId;

// ---------------------------------------------------------------------------
// LED ring position lines (D1 – D16), active HIGH
// ---------------------------------------------------------------------------

/// Position lines in ring order.  Index 0 is D1 (mask bit 0), index 15 is
/// D16 (mask bit 15, the start position).
///
/// GPIO 0, 3, 45 and 46 are strapping pins and 19/20 carry USB, so the ring
/// skips them.
pub const RING_GPIOS: [LineId; 16] = [1, 2, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17];

// ---------------------------------------------------------------------------
// Color select lines, active HIGH (exactly one driven at a time)
// ---------------------------------------------------------------------------

pub const COLOR_RED_GPIO: LineId = 38;
pub const COLOR_GREEN_GPIO: LineId = 39;
pub const COLOR_BLUE_GPIO: LineId = 40;

// ---------------------------------------------------------------------------
// User inputs (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// SB1: momentary button, cycles the brightness level.
pub const BRIGHTNESS_BUTTON_GPIO: LineId = 41;
/// SB2: momentary button, cycles the color.
pub const COLOR_BUTTON_GPIO: LineId = 42;
/// SW1: speed selector, low bit.
pub const SPEED_SW1_GPIO: LineId = 47;
/// SW2: speed selector, high bit.
pub const SPEED_SW2_GPIO: LineId = 48;

/// Complete line assignment consumed by [`crate::app::service::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub ring: [LineId; 16],
    pub red: LineId,
    pub green: LineId,
    pub blue: LineId,
    pub brightness_button: LineId,
    pub color_button: LineId,
    pub speed_sw1: LineId,
    pub speed_sw2: LineId,
}

impl PinMap {
    /// The board wiring above.
    pub const fn board() -> Self {
        Self {
            ring: RING_GPIOS,
            red: COLOR_RED_GPIO,
            green: COLOR_GREEN_GPIO,
            blue: COLOR_BLUE_GPIO,
            brightness_button: BRIGHTNESS_BUTTON_GPIO,
            color_button: COLOR_BUTTON_GPIO,
            speed_sw1: SPEED_SW1_GPIO,
            speed_sw2: SPEED_SW2_GPIO,
        }
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::board()
    }
}
