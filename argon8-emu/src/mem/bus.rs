// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use argon8_core::{Addressable, IrqLine, Ram, Rom, Shared, VideoMode, VideoSink};
use bit_field::BitField;
use time::OffsetDateTime;

use super::map::{BankMap, Source, Window};
use crate::device::{CartKind, Cartridge, KeyEvent, Keyboard, Joysticks, Lightpen};
use crate::io::Timer;
use crate::video::RasterGate;

// Design:
//   The bus owns every byte of machine state and decodes raw 16-bit cpu
//   addresses through the active windows maintained by BankMap. I/O
//   registers at 0xE7C0..0xE7FF dispatch here because most of them cut
//   across banking, video, timer and input state at once.

pub const RAM_SIZE: usize = 0x80000;
pub const PORT_SIZE: usize = 0x40;
pub const PALETTE_SIZE: usize = 0x20;

const VIDEO_PAGE_SIZE: usize = 0x4000;
const MAX_SOUND_LEVEL: u8 = 0x3f;

// keyboard latches inside the monitor image
const MONITOR_KEY_CODE: usize = 0x30f8;
const MONITOR_KEY_CTRL: usize = 0x3125;

// the key interrupt is held for at most half a second
const KEYBOARD_IRQ_CYCLES: i32 = 500000;

pub struct Bus {
    // memory
    pub(crate) ram: Ram,
    pub(crate) basic: Rom,
    pub(crate) monitor: Rom,
    pub(crate) port: [u8; PORT_SIZE],
    pub(crate) palette: [u8; PALETTE_SIZE],
    pub(crate) map: BankMap,
    // display scanout
    pub(crate) page_video: usize,
    pub(crate) border_color: u8,
    // peripherals
    pub(crate) cartridge: Cartridge,
    pub(crate) timer: Timer,
    pub(crate) gate: RasterGate,
    pub(crate) keyboard: Keyboard,
    pub(crate) joysticks: Joysticks,
    pub(crate) lightpen: Lightpen,
    pub(crate) sound: u8,
    pub(crate) mute: bool,
    // I/O
    pub(crate) irq_line: Shared<IrqLine>,
    pub(crate) video: Shared<dyn VideoSink>,
}

impl Bus {
    pub fn new(irq_line: Shared<IrqLine>, video: Shared<dyn VideoSink>) -> Self {
        Bus {
            ram: Ram::new(RAM_SIZE),
            basic: Rom::new(0),
            monitor: Rom::new(0),
            port: [0; PORT_SIZE],
            palette: [0; PALETTE_SIZE],
            map: BankMap::new(),
            page_video: 0,
            border_color: 0,
            cartridge: Cartridge::new(),
            timer: Timer::new(),
            gate: RasterGate::new(),
            keyboard: Keyboard::new(),
            joysticks: Joysticks::new(),
            lightpen: Lightpen::new(),
            sound: 0,
            mute: false,
            irq_line,
            video,
        }
    }

    /// Reinitializes the machine to its power-on state and rebuilds the
    /// patched firmware images from the pristine blobs.
    pub fn hard_reset(
        &mut self,
        basic: &[u8],
        basic_patch: &[i32],
        monitor: &[u8],
        monitor_patch: &[i32],
    ) {
        // power-on ram checker pattern, bit 7 of the index decides the byte
        for i in 0..RAM_SIZE {
            self.ram.write(i, if i & 0x80 == 0 { 0x00 } else { 0xff });
        }
        self.port = [0; PORT_SIZE];
        self.port[0x09] = 0x0f;
        self.palette = [0; PALETTE_SIZE];
        self.cartridge.reset();
        self.basic = Rom::new_with_data(basic);
        self.basic.patch(basic_patch, 0);
        patch_boot_date(&mut self.basic);
        self.monitor = Rom::new_with_data(monitor);
        self.monitor.patch(monitor_patch, 0xe000);
        self.keyboard.reset();
        self.joysticks.reset();
        self.lightpen.reset();
        self.timer.reset();
        self.gate.reset();
        self.sound = 0;
        self.mute = false;
        self.map = BankMap::new();
        self.video.borrow_mut().set_mode(VideoMode::Mode320x16);
        self.videopage_bordercolor(self.port[0x1d]);
        self.map.refresh_video_ram(&self.port);
        self.map.refresh_ram_bank(&self.port);
        self.map.refresh_rom_bank(&self.port, self.cartridge.flags);
        self.irq_line.borrow_mut().reset();
    }

    /// Advances everything that moves between instructions: the raster
    /// beam, the interrupt hold counters, the composite flag and the 6846
    /// countdown.
    pub fn clock(&mut self, cycles: i32) {
        {
            let vram = &self.ram.bytes()[self.page_video..self.page_video + VIDEO_PAGE_SIZE];
            let mut video = self.video.borrow_mut();
            self.gate.advance(cycles, &mut *video, vram);
        }
        if !self.timer.count_down_irq(cycles) {
            self.port[0x00] &= 0xfe;
        }
        if !self.keyboard.count_down_irq(cycles) {
            self.port[0x00] &= 0xfd;
        }
        if self.port[0x00] & 0x07 == 0 {
            self.port[0x00] &= 0x7f;
            self.irq_line.borrow_mut().clear();
        }
        if self.timer.clock(cycles, self.port[0x05]) {
            self.port[0x00] |= 0x81;
            self.irq_line.borrow_mut().raise();
        }
    }

    // -- Input surface

    pub fn key(&mut self, scancode: u8, down: bool) {
        match self.keyboard.key_event(scancode, down) {
            KeyEvent::None => {}
            KeyEvent::AllReleased => {
                self.port[0x08] = 0x00;
                self.keyboard.irq_count = 0;
            }
            KeyEvent::Code { code, ctrl } => {
                self.monitor.poke(MONITOR_KEY_CODE, code);
                self.monitor.poke(MONITOR_KEY_CTRL, ctrl as u8);
                self.port[0x08] |= 0x01;
                self.port[0x00] |= 0x82;
                self.keyboard.irq_count = KEYBOARD_IRQ_CYCLES;
                self.irq_line.borrow_mut().raise();
            }
        }
    }

    pub fn joy(&mut self, axis: u8, on: bool) {
        self.joysticks.set_axis(axis, on);
    }

    pub fn set_lightpen(&mut self, x: i32, y: i32, button: bool) {
        self.lightpen.set(x, y, button);
    }

    pub fn attach_cartridge(&mut self, image: &[u8], kind: CartKind) {
        self.cartridge.attach(image, kind);
        self.map.refresh_rom_bank(&self.port, self.cartridge.flags);
    }

    // -- Audio

    /// Current speaker level as a signed 16-bit pcm sample.
    pub fn audio_sample(&self) -> i16 {
        (self.sound as i32 * 65535 / MAX_SOUND_LEVEL as i32 - 32768) as i16
    }

    pub fn is_muted(&self) -> bool {
        self.mute
    }

    // -- Host accessors

    pub fn get_port(&self, index: usize) -> u8 {
        self.port[index]
    }

    pub fn get_border_color(&self) -> u8 {
        self.border_color
    }

    /// The 16 KiB of ram the gate array currently scans out.
    pub fn get_video_page(&self) -> &[u8] {
        &self.ram.bytes()[self.page_video..self.page_video + VIDEO_PAGE_SIZE]
    }

    // -- Internal

    fn read_window(&self, window: Window, address: u16) -> u8 {
        let index = window.index(address);
        match window.source {
            Source::Ram => self.ram.read(index),
            Source::Cart => self.cartridge.data.read(index),
            Source::Basic => self.basic.read(index),
            Source::Monitor => self.monitor.read(index),
        }
    }

    fn write_window(&mut self, window: Window, address: u16, value: u8) {
        let index = window.index(address);
        match window.source {
            Source::Ram => self.ram.write(index, value),
            Source::Cart => self.cartridge.data.write(index, value),
            Source::Basic => {}
            Source::Monitor => {}
        }
    }

    fn io_read(&mut self, address: u16) -> u8 {
        match address {
            // composite status: bit 7 reflects any pending source
            0xe7c0 => {
                if self.port[0x00] != 0 {
                    self.port[0x00] | 0x80
                } else {
                    0
                }
            }
            0xe7c3 => self.port[0x03] | 0x80 | ((self.lightpen.button as u8) << 1),
            0xe7c6 => self.timer.read_high(),
            0xe7c7 => self.timer.read_low(),
            0xe7ca => self.gate.pia_status(),
            0xe7cc => {
                if self.port[0x0e] & 4 != 0 {
                    self.joysticks.position
                } else {
                    self.port[0x0c]
                }
            }
            0xe7cd => {
                if self.port[0x0f] & 4 != 0 {
                    self.joysticks.action | self.sound
                } else {
                    self.port[0x0d]
                }
            }
            0xe7ce => 0x04,
            0xe7da => {
                // reading walks the palette cursor across the raw byte
                let index = self.port[0x1b];
                self.port[0x1b] = index.wrapping_add(1);
                self.palette[(index & 0x1f) as usize]
            }
            0xe7df => {
                self.port[0x1e] = 0;
                self.port[0x1f]
            }
            0xe7e4 => self.port[0x1d] & 0xf0,
            0xe7e5 => self.port[0x25] & 0x1f,
            0xe7e6 => self.port[0x26] & 0x7f,
            0xe7e7 => (self.port[0x24] & 0x01) | self.gate.initn() | self.gate.iniln(),
            _ => self.port[(address & 0x3f) as usize],
        }
    }

    fn io_write(&mut self, address: u16, value: u8) {
        match address {
            0xe7c0 => self.port[0x00] = value,
            0xe7c1 => {
                self.port[0x01] = value;
                self.mute = value.get_bit(3);
            }
            0xe7c3 => {
                self.port[0x03] = value & 0x3d;
                // dropping the acknowledge bit cancels the key interrupt
                if value & 0x20 == 0 {
                    self.keyboard.irq_count = 0;
                }
                self.map.refresh_video_ram(&self.port);
                self.map.refresh_rom_bank(&self.port, self.cartridge.flags);
            }
            0xe7c5 => {
                self.port[0x05] = value;
                self.timer.control(value);
            }
            0xe7c6 => self.timer.set_latch_high(value),
            0xe7c7 => self.timer.set_latch_low(value),
            0xe7c9 => {
                self.port[0x09] = value;
                self.map.refresh_ram_bank(&self.port);
            }
            0xe7cc => self.port[0x0c] = value,
            0xe7cd => {
                if self.port[0x0f] & 4 != 0 {
                    self.sound = value & MAX_SOUND_LEVEL;
                } else {
                    self.port[0x0d] = value;
                }
            }
            0xe7ce => self.port[0x0e] = value,
            0xe7cf => self.port[0x0f] = value,
            0xe7da => self.palette_color(value),
            0xe7db => self.port[0x1b] = value,
            0xe7dc => self.video_mode(value),
            0xe7dd => self.videopage_bordercolor(value),
            0xe7e4 => self.port[0x24] = value,
            0xe7e5 => {
                self.port[0x25] = value;
                self.map.refresh_ram_bank(&self.port);
            }
            0xe7e6 => {
                self.port[0x26] = value;
                self.map.refresh_rom_bank(&self.port, self.cartridge.flags);
            }
            0xe7e7 => {
                self.port[0x27] = value;
                self.map.refresh_ram_bank(&self.port);
            }
            _ => {}
        }
    }

    /// Palette entries commit in pairs: the even byte latches red and
    /// green, the odd byte carries blue and completes the entry.
    fn palette_color(&mut self, value: u8) {
        let index = (self.port[0x1b] & 0x1f) as usize;
        self.palette[index] = value;
        self.port[0x1b] = ((index + 1) & 0x1f) as u8;
        if index & 1 != 0 {
            let low = self.palette[index & 0x1e];
            self.video.borrow_mut().set_palette(
                index >> 1,
                low & 0x0f,
                (low & 0xf0) >> 4,
                value & 0x0f,
            );
        }
    }

    fn video_mode(&mut self, value: u8) {
        self.port[0x1c] = value;
        let mode = match value {
            0x21 => VideoMode::Mode320x4,
            0x2a => VideoMode::Mode640x2,
            0x41 => VideoMode::Mode320x4Special,
            0x7b => VideoMode::Mode160x16,
            _ => VideoMode::Mode320x16,
        };
        self.video.borrow_mut().set_mode(mode);
    }

    pub(crate) fn videopage_bordercolor(&mut self, value: u8) {
        self.port[0x1d] = value;
        self.page_video = ((value & 0xc0) as usize) << 8;
        self.border_color = value & 0x0f;
    }
}

impl Addressable for Bus {
    fn read(&mut self, address: u16) -> u8 {
        match address >> 12 {
            // when ram overlays the rom space its two 8K halves are
            // addressed with their bases swapped
            0x0 | 0x1 => {
                if self.port[0x26] & 0x20 != 0 {
                    self.read_window(self.map.rom_bank, address + 0x2000)
                } else {
                    self.read_window(self.map.rom_bank, address)
                }
            }
            0x2 | 0x3 => {
                if self.port[0x26] & 0x20 != 0 {
                    self.read_window(self.map.rom_bank, address - 0x2000)
                } else {
                    self.read_window(self.map.rom_bank, address)
                }
            }
            0x4 | 0x5 => self.read_window(self.map.video_ram, address),
            0x6..=0x9 => self.read_window(self.map.user_ram, address),
            0xa..=0xd => self.read_window(self.map.ram_bank, address),
            0xe if (0xe7c0..=0xe7ff).contains(&address) => self.io_read(address),
            _ => self.read_window(self.map.system_rom, address),
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        match address >> 12 {
            0x0 | 0x1 => {
                // a store into the cartridge space switches banks by its
                // address bits, even when the store itself is dropped
                if self.port[0x26] & 0x20 == 0 {
                    self.cartridge.select_bank(address as u8);
                    self.map.refresh_rom_bank(&self.port, self.cartridge.flags);
                }
                if self.port[0x26] & 0x60 != 0x60 {
                    return;
                }
                self.write_window(self.map.rom_bank, address + 0x2000, value);
            }
            0x2 | 0x3 => {
                if self.port[0x26] & 0x60 != 0x60 {
                    return;
                }
                self.write_window(self.map.rom_bank, address - 0x2000, value);
            }
            0x4 | 0x5 => self.write_window(self.map.video_ram, address, value),
            0x6..=0x9 => self.write_window(self.map.user_ram, address, value),
            0xa..=0xd => self.write_window(self.map.ram_bank, address, value),
            0xe if (0xe7c0..=0xe7ff).contains(&address) => self.io_write(address, value),
            _ => {}
        }
    }
}

/// Stamps the host-local date into the BASIC rom and wires the boot
/// sequence to initialize it (LDX #$2B90 / BSR $29C8).
fn patch_boot_date(basic: &mut Rom) {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    patch_date(
        basic,
        now.day(),
        u8::from(now.month()),
        (now.year().rem_euclid(100)) as u8,
    );
}

fn patch_date(basic: &mut Rom, day: u8, month: u8, year: u8) {
    let stamp = format!("{:02}-{:02}-{:02}", day, month, year);
    for (i, byte) in stamp.bytes().enumerate() {
        basic.poke(0xeb90 + i, byte);
    }
    basic.poke(0xeb98, 0x1f);
    for (i, byte) in [0x8e, 0x2b, 0x90, 0xbd, 0x29, 0xc8].iter().enumerate() {
        basic.poke(0xe4e2 + i, *byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_patch_layout() {
        let mut basic = Rom::new(0x10000);
        patch_date(&mut basic, 15, 1, 24);
        assert_eq!(b"15-01-24", &basic.bytes()[0xeb90..0xeb98]);
        assert_eq!(0x1f, basic.read(0xeb98));
        assert_eq!(
            &[0x8e, 0x2b, 0x90, 0xbd, 0x29, 0xc8],
            &basic.bytes()[0xe4e2..0xe4e8]
        );
    }

    #[test]
    fn audio_sample_range() {
        let irq_line = argon8_core::new_shared(IrqLine::new("irq"));
        let video: Shared<dyn VideoSink> = argon8_core::new_shared(NullVideo);
        let mut bus = Bus::new(irq_line, video);
        assert_eq!(-32768, bus.audio_sample());
        bus.sound = MAX_SOUND_LEVEL;
        assert_eq!(32767, bus.audio_sample());
    }

    struct NullVideo;

    impl VideoSink for NullVideo {
        fn set_mode(&mut self, _mode: VideoMode) {}
        fn set_palette(&mut self, _index: usize, _r: u8, _g: u8, _b: u8) {}
        fn draw_segment(&mut self, _vram: &[u8], _line_cycle: i32) {}
        fn next_line(&mut self) {}
        fn snapshot_size(&self) -> usize {
            0
        }
        fn serialize(&self, _writer: &mut argon8_core::SnapshotWriter) {}
        fn deserialize(&mut self, _reader: &mut argon8_core::SnapshotReader) {}
    }
}
