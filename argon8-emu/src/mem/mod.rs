// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

mod bus;
mod map;

pub use self::bus::{Bus, PALETTE_SIZE, PORT_SIZE, RAM_SIZE};
pub use self::map::{BankMap, Source, Window};
