// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

mod config;
mod machine;
mod snapshot;

pub use self::config::{Config, RomImage, RomSet, BASIC_ROM_SIZE, MONITOR_ROM_SIZE};
pub use self::machine::{Machine, SpecialOpFn};
