// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use argon8_core::{Flavor, SnapshotReader, SnapshotWriter};

use super::machine::Machine;
use crate::device::keyboard::KEY_COUNT;
use crate::mem::{PALETTE_SIZE, PORT_SIZE, RAM_SIZE};

// The layout is frozen: flavor, opaque cpu and video state, the three
// memory arrays as raw bytes, then every counter and latch as a 4-byte
// little-endian integer, in exactly this order. The cartridge window and
// the patched firmware are not part of it; the firmware is rebuilt
// deterministically at reset and the window is reloaded by the host.

/// Integer fields following the byte arrays: six bank indices, carflags,
/// the key matrix, capslock, both joystick bytes, the lightpen triple,
/// four raster fields, border/sound/mute and the four timer words.
const INT_FIELDS: usize = 6 + 1 + KEY_COUNT + 1 + 2 + 3 + 4 + 3 + 4;

impl Machine {
    /// Exact byte count of a serialized machine, so callers can
    /// preallocate the buffer.
    pub fn snapshot_size(&self) -> usize {
        4 + self.cpu.snapshot_size()
            + self.video.borrow().snapshot_size()
            + RAM_SIZE
            + PORT_SIZE
            + PALETTE_SIZE
            + INT_FIELDS * 4
    }

    pub fn serialize(&self, buffer: &mut [u8]) {
        let mut writer = SnapshotWriter::new(buffer);
        writer.put_i32(self.flavor.id());
        self.cpu.serialize(&mut writer);
        self.video.borrow().serialize(&mut writer);
        let bus = &*self.bus.borrow();
        writer.put_bytes(bus.ram.bytes());
        writer.put_bytes(&bus.port);
        writer.put_bytes(&bus.palette);
        writer.put_i32(bus.map.nvideopage);
        writer.put_i32(bus.map.nvideobank);
        writer.put_i32(bus.map.nrambank);
        writer.put_i32(bus.map.nrombank);
        writer.put_i32(bus.map.nsystbank);
        writer.put_i32(bus.map.nctrlbank);
        writer.put_i32(bus.cartridge.flags as i32);
        for key in bus.keyboard.keys.iter() {
            writer.put_i32(*key as i32);
        }
        writer.put_i32(bus.keyboard.capslock as i32);
        writer.put_i32(bus.joysticks.position as i32);
        writer.put_i32(bus.joysticks.action as i32);
        writer.put_i32(bus.lightpen.x);
        writer.put_i32(bus.lightpen.y);
        writer.put_i32(bus.lightpen.button as i32);
        writer.put_i32(bus.gate.line_cycle);
        writer.put_i32(bus.gate.line_number);
        writer.put_i32(bus.gate.vbl);
        writer.put_i32(bus.gate.display as i32);
        writer.put_i32(bus.border_color as i32);
        writer.put_i32(bus.sound as i32);
        writer.put_i32(bus.mute as i32);
        writer.put_i32(bus.timer.counter);
        writer.put_i32(bus.timer.latch);
        writer.put_i32(bus.keyboard.irq_count);
        writer.put_i32(bus.timer.irq_count);
    }

    /// Restores a machine serialized by `serialize`. The flavor is applied
    /// first (a change triggers a hard reset that rebinds the monitor
    /// rom), then the state is loaded and the derived windows are rebuilt
    /// from the restored latches.
    pub fn deserialize(&mut self, buffer: &[u8]) {
        let mut reader = SnapshotReader::new(buffer);
        if let Some(flavor) = Flavor::from_id(reader.get_i32()) {
            self.set_flavor(flavor);
        }
        self.cpu.deserialize(&mut reader);
        self.video.borrow_mut().deserialize(&mut reader);
        let bus = &mut *self.bus.borrow_mut();
        reader.get_bytes(bus.ram.bytes_mut());
        reader.get_bytes(&mut bus.port);
        reader.get_bytes(&mut bus.palette);
        bus.map.nvideopage = reader.get_i32();
        bus.map.nvideobank = reader.get_i32();
        bus.map.nrambank = reader.get_i32();
        bus.map.nrombank = reader.get_i32();
        bus.map.nsystbank = reader.get_i32();
        bus.map.nctrlbank = reader.get_i32();
        bus.cartridge.flags = reader.get_i32() as u8;
        for key in bus.keyboard.keys.iter_mut() {
            *key = reader.get_i32() as u8;
        }
        bus.keyboard.capslock = reader.get_i32() != 0;
        bus.joysticks.position = reader.get_i32() as u8;
        bus.joysticks.action = reader.get_i32() as u8;
        bus.lightpen.x = reader.get_i32();
        bus.lightpen.y = reader.get_i32();
        bus.lightpen.button = reader.get_i32() != 0;
        bus.gate.line_cycle = reader.get_i32();
        bus.gate.line_number = reader.get_i32();
        bus.gate.vbl = reader.get_i32();
        bus.gate.display = reader.get_i32() != 0;
        bus.border_color = reader.get_i32() as u8;
        bus.sound = reader.get_i32() as u8;
        bus.mute = reader.get_i32() != 0;
        bus.timer.counter = reader.get_i32();
        bus.timer.latch = reader.get_i32();
        bus.keyboard.irq_count = reader.get_i32();
        bus.timer.irq_count = reader.get_i32();
        // rebuild the derived pointers from the restored latches
        let page = bus.port[0x1d];
        bus.videopage_bordercolor(page);
        bus.map.refresh_video_ram(&bus.port);
        bus.map.refresh_ram_bank(&bus.port);
        let carflags = bus.cartridge.flags;
        bus.map.refresh_rom_bank(&bus.port, carflags);
    }
}
