// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

mod cartridge;
mod joystick;
pub mod keyboard;
mod lightpen;

pub use self::cartridge::{CartKind, Cartridge};
pub use self::joystick::Joysticks;
pub use self::keyboard::{KeyEvent, Keyboard};
pub use self::lightpen::Lightpen;
