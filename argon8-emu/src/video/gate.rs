// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use argon8_core::VideoSink;

// Raster geometry: 64 cpu cycles per scanline (1 cycle per microsecond),
// 312 lines per field. Line regions:
//   0-47 off-screen top, 48-55 top border, 56-255 visible,
//   256-263 bottom border, 264-311 off-screen bottom.
pub(crate) const CYCLES_PER_LINE: i32 = 64;
pub(crate) const LINES_PER_FRAME: i32 = 312;
const VBL_COUNT: i32 = 2;

/// Raster-synchronous part of the gate array: tracks the beam position,
/// pushes display segments and line steps to the renderer, and derives the
/// sync bits the monitor rom polls.
pub struct RasterGate {
    pub(crate) line_cycle: i32,
    pub(crate) line_number: i32,
    pub(crate) vbl: i32,
    pub(crate) display: bool,
}

impl RasterGate {
    pub fn new() -> Self {
        Self {
            line_cycle: 0,
            line_number: 0,
            vbl: 0,
            display: false,
        }
    }

    pub fn reset(&mut self) {
        self.line_cycle = 0;
        self.line_number = 0;
        self.vbl = 0;
        self.display = false;
    }

    /// Advances the beam by one instruction's cycles. Display output is
    /// emitted before the line boundary is evaluated, matching the order
    /// the hardware drains a partially drawn line.
    pub fn advance(&mut self, cycles: i32, video: &mut dyn VideoSink, vram: &[u8]) {
        self.line_cycle += cycles;
        if self.display {
            video.draw_segment(vram, self.line_cycle);
        }
        if self.line_cycle >= CYCLES_PER_LINE {
            self.line_cycle -= CYCLES_PER_LINE;
            if self.display {
                video.next_line();
            }
            self.line_number += 1;
            if self.line_number > 311 {
                self.line_number -= LINES_PER_FRAME;
                self.vbl += 1;
                if self.vbl >= VBL_COUNT {
                    self.vbl = 0;
                }
            }
            self.display =
                self.vbl == 0 && self.line_number > 47 && self.line_number < 264;
        }
    }

    /// Horizontal sync bit: 0x20 between 11 and 51 microseconds into the
    /// line.
    pub fn iniln(&self) -> u8 {
        if self.line_cycle < 11 || self.line_cycle > 51 {
            0
        } else {
            0x20
        }
    }

    /// Vertical sync bit: 0x80 from (line 56, cycle 12) through
    /// (line 255, cycle 50).
    pub fn initn(&self) -> u8 {
        if self.line_number < 56 || self.line_number > 255 {
            return 0;
        }
        if self.line_number == 56 && self.line_cycle < 12 {
            return 0;
        }
        if self.line_number == 255 && self.line_cycle > 50 {
            return 0;
        }
        0x80
    }

    /// Frame position as seen through the system PIA control register.
    pub fn pia_status(&self) -> u8 {
        if self.line_number < 200 {
            0
        } else {
            2
        }
    }
}
