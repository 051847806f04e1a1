// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

/// Machine flavor. TO8 and TO8D share the BASIC image but boot different
/// monitor roms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flavor {
    To8,
    To8d,
}

impl Flavor {
    pub fn from(model: &str) -> Flavor {
        match model {
            "to8" => Flavor::To8,
            "to8d" => Flavor::To8d,
            _ => panic!("invalid model {}", model),
        }
    }

    /// Stable id used in the snapshot layout.
    pub fn id(self) -> i32 {
        match self {
            Flavor::To8 => 0,
            Flavor::To8d => 1,
        }
    }

    pub fn from_id(id: i32) -> Option<Flavor> {
        match id {
            0 => Some(Flavor::To8),
            1 => Some(Flavor::To8d),
            _ => None,
        }
    }
}

/// Gate-array display modes selectable through register 0xE7DC.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VideoMode {
    Mode320x16,
    Mode320x4,
    Mode320x4Special,
    Mode640x2,
    Mode160x16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flavor_from_str() {
        assert_eq!(Flavor::To8d, Flavor::from("to8d"));
    }

    #[test]
    fn flavor_id_round_trip() {
        assert_eq!(Some(Flavor::To8), Flavor::from_id(Flavor::To8.id()));
        assert_eq!(Some(Flavor::To8d), Flavor::from_id(Flavor::To8d.id()));
        assert_eq!(None, Flavor::from_id(7));
    }
}
