// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use argon8_core::Ram;
use bit_field::BitField;

/// Cartridge window, four 16 KiB banks.
pub const CARTRIDGE_SIZE: usize = 0x10000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CartKind {
    Simple,
    SwitchBank,
    Os9,
}

/// Cartridge window with its control flags: bits 0, 1 and 4 select the
/// bank, bit 2 enables the cartridge, bit 3 enables writes. Image parsing
/// belongs to the host; the window only takes raw bytes.
pub struct Cartridge {
    pub(crate) data: Ram,
    pub(crate) kind: CartKind,
    pub(crate) flags: u8,
}

impl Cartridge {
    pub fn new() -> Self {
        Self {
            data: Ram::new(CARTRIDGE_SIZE),
            kind: CartKind::Simple,
            flags: 0x00,
        }
    }

    pub fn reset(&mut self) {
        self.data.fill(0x00);
        // bank selection is dropped, enable and write bits survive a reset
        self.flags &= 0xec;
    }

    /// Copies a raw image into the window, enables it and selects bank 0.
    pub fn attach(&mut self, image: &[u8], kind: CartKind) {
        self.data.fill(0x00);
        let len = image.len().min(CARTRIDGE_SIZE);
        self.data.load(&image[..len], 0);
        self.kind = kind;
        self.flags = (self.flags & 0xec) | 0x04;
    }

    pub fn get_kind(&self) -> CartKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.get_bit(2)
    }

    pub fn bank(&self) -> u8 {
        self.flags & 3
    }

    /// Bank switching by write address: the low bits of a store into the
    /// rom space become the bank selection.
    pub fn select_bank(&mut self, address_bits: u8) {
        self.flags = (self.flags & 0xfc) | (address_bits & 3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_enables_and_selects_bank_0() {
        let mut cartridge = Cartridge::new();
        cartridge.select_bank(3);
        cartridge.attach(&[0x11, 0x22], CartKind::SwitchBank);
        assert_eq!(true, cartridge.is_enabled());
        assert_eq!(0, cartridge.bank());
        assert_eq!(0x22, cartridge.data.read(1));
    }

    #[test]
    fn select_bank_keeps_control_bits() {
        let mut cartridge = Cartridge::new();
        cartridge.attach(&[], CartKind::Simple);
        cartridge.select_bank(0xfe);
        assert_eq!(2, cartridge.bank());
        assert_eq!(true, cartridge.is_enabled());
    }

    #[test]
    fn reset_clears_banks_not_enable() {
        let mut cartridge = Cartridge::new();
        cartridge.attach(&[0xaa], CartKind::Simple);
        cartridge.select_bank(1);
        cartridge.reset();
        assert_eq!(0, cartridge.bank());
        assert_eq!(true, cartridge.is_enabled());
        assert_eq!(0x00, cartridge.data.read(0));
    }
}
