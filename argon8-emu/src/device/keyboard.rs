// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

/// Number of keys in the TO8/TO8D matrix.
pub const KEY_COUNT: usize = 84;

/// Scancodes capslock forces to their shifted form (the alphabetic keys).
const CAPSLOCK_KEYS: [u8; 26] = [
    0x02, 0x03, 0x07, 0x0a, 0x0b, 0x0f, 0x12, 0x13, 0x17, 0x1a, 0x1b, 0x1f, 0x22,
    0x23, 0x27, 0x2a, 0x2b, 0x2f, 0x32, 0x33, 0x3a, 0x3b, 0x42, 0x43, 0x4a, 0x4b,
];

const SC_CAPSLOCK: u8 = 0x50;
const SC_LSHIFT: u8 = 0x51;
const SC_RSHIFT: u8 = 0x52;
const SC_CTRL: u8 = 0x53;

/// Last scancode 0x50..0x53 are capslock, shifts and ctrl; anything above
/// 0x4f never produces a key code of its own.
const LAST_MATRIX_KEY: u8 = 0x4f;

/// Outcome of a host key transition, turned into port bits, monitor
/// latches and interrupt state by the bus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyEvent {
    /// Nothing to latch: a modifier, or other keys are still held down.
    None,
    /// Every matrix key is back up.
    AllReleased,
    /// A key code to present to the monitor, with the CTRL indicator.
    Code { code: u8, ctrl: bool },
}

/// Key matrix state. A key slot holds 0x00 while pressed and 0x80 while
/// released, mirroring the value the monitor rom expects to find.
pub struct Keyboard {
    pub(crate) keys: [u8; KEY_COUNT],
    pub(crate) capslock: bool,
    pub(crate) irq_count: i32,
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [0x80; KEY_COUNT],
            capslock: true,
            irq_count: 0,
        }
    }

    pub fn reset(&mut self) {
        self.keys = [0x80; KEY_COUNT];
        self.capslock = true;
        self.irq_count = 0;
    }

    pub fn key_event(&mut self, scancode: u8, down: bool) -> KeyEvent {
        let slot = scancode as usize;
        if slot >= KEY_COUNT {
            return KeyEvent::None;
        }
        self.keys[slot] = if down { 0x00 } else { 0x80 };
        if !down {
            // a release only matters once the whole matrix is idle
            if self.keys[..=LAST_MATRIX_KEY as usize].iter().any(|&key| key == 0x00) {
                return KeyEvent::None;
            }
            return KeyEvent::AllReleased;
        }
        if scancode == SC_CAPSLOCK {
            self.capslock = !self.capslock;
            return KeyEvent::None;
        }
        if scancode > LAST_MATRIX_KEY {
            return KeyEvent::None;
        }
        let mut shift = 0x00;
        if self.keys[SC_LSHIFT as usize] == 0x00 || self.keys[SC_RSHIFT as usize] == 0x00 {
            shift = 0x80;
        }
        if self.capslock && CAPSLOCK_KEYS.contains(&scancode) {
            shift = 0x80;
        }
        KeyEvent::Code {
            code: scancode | shift,
            ctrl: self.keys[SC_CTRL as usize] == 0x00,
        }
    }

    /// Counts down the keyboard interrupt hold; returns whether the
    /// keyboard interrupt flag is still asserted.
    pub fn count_down_irq(&mut self, cycles: i32) -> bool {
        if self.irq_count > 0 {
            self.irq_count -= cycles;
        }
        self.irq_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_press() {
        let mut keyboard = Keyboard::new();
        keyboard.capslock = false;
        assert_eq!(
            KeyEvent::Code {
                code: 0x10,
                ctrl: false
            },
            keyboard.key_event(0x10, true)
        );
    }

    #[test]
    fn shift_key_marks_code() {
        let mut keyboard = Keyboard::new();
        keyboard.capslock = false;
        assert_eq!(KeyEvent::None, keyboard.key_event(SC_LSHIFT, true));
        assert_eq!(
            KeyEvent::Code {
                code: 0x90,
                ctrl: false
            },
            keyboard.key_event(0x10, true)
        );
    }

    #[test]
    fn capslock_forces_shift_on_letters() {
        let mut keyboard = Keyboard::new();
        // capslock is engaged after reset
        assert_eq!(
            KeyEvent::Code {
                code: 0x82,
                ctrl: false
            },
            keyboard.key_event(0x02, true)
        );
        // non-alphabetic scancodes are unaffected
        assert_eq!(
            KeyEvent::Code {
                code: 0x01,
                ctrl: false
            },
            keyboard.key_event(0x01, true)
        );
    }

    #[test]
    fn capslock_toggles() {
        let mut keyboard = Keyboard::new();
        assert_eq!(KeyEvent::None, keyboard.key_event(SC_CAPSLOCK, true));
        assert_eq!(
            KeyEvent::Code {
                code: 0x02,
                ctrl: false
            },
            keyboard.key_event(0x02, true)
        );
    }

    #[test]
    fn ctrl_indicator() {
        let mut keyboard = Keyboard::new();
        keyboard.capslock = false;
        keyboard.key_event(SC_CTRL, true);
        assert_eq!(
            KeyEvent::Code {
                code: 0x10,
                ctrl: true
            },
            keyboard.key_event(0x10, true)
        );
    }

    #[test]
    fn release_waits_for_idle_matrix() {
        let mut keyboard = Keyboard::new();
        keyboard.capslock = false;
        keyboard.key_event(0x10, true);
        keyboard.key_event(0x11, true);
        assert_eq!(KeyEvent::None, keyboard.key_event(0x10, false));
        assert_eq!(KeyEvent::AllReleased, keyboard.key_event(0x11, false));
    }
}
