//! LED ring output driver.
//!
//! Sixteen position lines (D1-D16) plus three color-select lines.  A LED
//! lights only when its position line and the active color line are both
//! high, so blanking the position lines is enough to switch the ring off.
//!
//! Called from the overflow and compare ISRs: no allocation, no logging,
//! bounded work (at most one write per line per call).  A shadow copy of
//! the last written levels skips writes that would not change a line.

use heapless::Vec;

use crate::animation::state::{Color, MAX_RING_SIZE, PositionMask};
use crate::app::ports::{GpioPort, OutputHandle};

pub struct RingLeds {
    positions: Vec<OutputHandle, { MAX_RING_SIZE as usize }>,
    colors: [OutputHandle; 3],
    /// Last levels written to the position lines.
    shadow_mask: u16,
    /// Last color line driven high.
    shadow_color: Option<Color>,
}

impl RingLeds {
    /// Take ownership of the configured lines and drive every one low.
    ///
    /// `positions` beyond [`MAX_RING_SIZE`] are ignored.
    pub fn new<P: GpioPort + ?Sized>(
        port: &P,
        positions: &[OutputHandle],
        colors: [OutputHandle; 3],
    ) -> Self {
        let positions: Vec<OutputHandle, { MAX_RING_SIZE as usize }> =
            positions.iter().copied().take(MAX_RING_SIZE as usize).collect();
        for &line in positions.iter().chain(colors.iter()) {
            port.set_output_level(line, false);
        }
        Self {
            positions,
            colors,
            shadow_mask: 0,
            shadow_color: None,
        }
    }

    /// Light `mask` in `color`.
    pub fn show<P: GpioPort + ?Sized>(&mut self, port: &P, mask: PositionMask, color: Color) {
        if self.shadow_color != Some(color) {
            for (candidate, &line) in Color::ALL.iter().zip(self.colors.iter()) {
                port.set_output_level(line, *candidate == color);
            }
            self.shadow_color = Some(color);
        }
        self.write_mask(port, mask.bits());
    }

    /// Switch every position off.  Color lines keep their level.
    pub fn blank<P: GpioPort + ?Sized>(&mut self, port: &P) {
        self.write_mask(port, 0);
    }

    /// Position bits currently driven high.
    pub fn lit(&self) -> u16 {
        self.shadow_mask
    }

    fn write_mask<P: GpioPort + ?Sized>(&mut self, port: &P, bits: u16) {
        let changed = self.shadow_mask ^ bits;
        if changed == 0 {
            return;
        }
        for (i, &line) in self.positions.iter().enumerate() {
            if changed & (1 << i) != 0 {
                port.set_output_level(line, bits & (1 << i) != 0);
            }
        }
        self.shadow_mask = bits;
    }
}
