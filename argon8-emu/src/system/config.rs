// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

/// Four 16 KiB BASIC banks.
pub const BASIC_ROM_SIZE: usize = 0x10000;
/// Two 8 KiB monitor banks.
pub const MONITOR_ROM_SIZE: usize = 0x4000;

/// A firmware blob together with its patch table. The table is the
/// repeating `[n, base, offset, byte..]` stream the rom patcher walks at
/// reset, terminated by a zero count.
pub struct RomImage {
    pub data: Vec<u8>,
    pub patch: Vec<i32>,
}

impl RomImage {
    pub fn new(data: &[u8], patch: &[i32]) -> Self {
        RomImage {
            data: data.to_vec(),
            patch: patch.to_vec(),
        }
    }

    pub fn empty(capacity: usize) -> Self {
        RomImage {
            data: vec![0x00; capacity],
            patch: vec![0],
        }
    }
}

/// Firmware set for both flavors: the BASIC image is shared, the monitor
/// differs between TO8 and TO8D.
pub struct RomSet {
    pub basic: RomImage,
    pub to8_monitor: RomImage,
    pub to8d_monitor: RomImage,
}

impl RomSet {
    pub fn default() -> Self {
        RomSet {
            basic: RomImage::empty(BASIC_ROM_SIZE),
            to8_monitor: RomImage::empty(MONITOR_ROM_SIZE),
            to8d_monitor: RomImage::empty(MONITOR_ROM_SIZE),
        }
    }
}

pub struct Config {
    pub roms: RomSet,
}

impl Config {
    pub fn new() -> Config {
        Config {
            roms: RomSet::default(),
        }
    }

    pub fn new_with_roms(roms: RomSet) -> Config {
        Config { roms }
    }
}
