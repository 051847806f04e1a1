// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

mod system_model;
mod types;

pub use self::system_model::{Flavor, VideoMode};
pub use self::types::{Addressable, Cpu, Step, SystemFactory, VideoSink};
