// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use std::rc::Rc;

use argon8_core::{new_shared, Cpu, Flavor, IrqLine, Shared, Step, SystemFactory, VideoSink};
use log::info;

use super::Config;
use crate::device::CartKind;
use crate::mem::Bus;

// Design:
//   Machine represents the computer itself. The cpu and the renderer are
//   external collaborators constructed through SystemFactory; they talk to
//   the core over the shared bus and interrupt line they were built with.

/// Cycle cost charged for an emulator-trap opcode.
const SPECIAL_OP_CYCLES: i32 = 64;

pub type SpecialOpFn = Box<dyn FnMut(u8)>;

pub struct Machine {
    // Dependencies
    config: Rc<Config>,
    pub(crate) flavor: Flavor,
    // Collaborators
    pub(crate) cpu: Box<dyn Cpu>,
    pub(crate) video: Shared<dyn VideoSink>,
    // State
    pub(crate) bus: Shared<Bus>,
    irq_line: Shared<IrqLine>,
    special_op: SpecialOpFn,
}

impl Machine {
    pub fn build(config: Rc<Config>, factory: &dyn SystemFactory) -> Machine {
        info!(target: "machine", "Initializing system");
        let irq_line = new_shared(IrqLine::new("irq"));
        let video = factory.new_video();
        let bus = new_shared(Bus::new(irq_line.clone(), video.clone()));
        let cpu = factory.new_cpu(bus.clone(), irq_line.clone());
        let mut machine = Machine {
            config,
            flavor: Flavor::To8,
            cpu,
            video,
            bus,
            irq_line,
            special_op: Box::new(|_| {}),
        };
        machine.hard_reset();
        machine
    }

    pub fn get_flavor(&self) -> Flavor {
        self.flavor
    }

    /// Switches between TO8 and TO8D. A change rebinds the monitor rom,
    /// which only takes effect through the hard reset it triggers.
    pub fn set_flavor(&mut self, flavor: Flavor) {
        if flavor != self.flavor {
            self.flavor = flavor;
            self.hard_reset();
        }
    }

    pub fn hard_reset(&mut self) {
        info!(target: "machine", "Resetting system");
        let roms = &self.config.roms;
        let monitor = match self.flavor {
            Flavor::To8 => &roms.to8_monitor,
            Flavor::To8d => &roms.to8d_monitor,
        };
        self.bus.borrow_mut().hard_reset(
            &roms.basic.data,
            &roms.basic.patch,
            &monitor.data,
            &monitor.patch,
        );
        self.cpu.reset();
    }

    /// Runs the core for at least `budget` cycles and returns the
    /// overshoot, to be deducted from the next budget.
    pub fn run(&mut self, budget: i32) -> i32 {
        if budget <= 0 {
            return 0;
        }
        let mut cycles = 0;
        while cycles < budget {
            let opcycles = match self.cpu.step() {
                Step::Normal(n) => n,
                Step::Special(op) => {
                    (self.special_op)(op);
                    SPECIAL_OP_CYCLES
                }
            };
            cycles += opcycles;
            self.bus.borrow_mut().clock(opcycles);
        }
        cycles - budget
    }

    /// Installs the host handler invoked for emulator-trap opcodes.
    pub fn set_special_op_handler(&mut self, handler: SpecialOpFn) {
        self.special_op = handler;
    }

    // -- Input surface

    pub fn key(&mut self, scancode: u8, down: bool) {
        self.bus.borrow_mut().key(scancode, down);
    }

    pub fn joy(&mut self, axis: u8, on: bool) {
        self.bus.borrow_mut().joy(axis, on);
    }

    pub fn set_lightpen(&mut self, x: i32, y: i32, button: bool) {
        self.bus.borrow_mut().set_lightpen(x, y, button);
    }

    // -- Audio

    pub fn audio_sample(&self) -> i16 {
        self.bus.borrow().audio_sample()
    }

    pub fn is_muted(&self) -> bool {
        self.bus.borrow().is_muted()
    }

    // -- Peripherals Ops

    pub fn attach_cartridge(&mut self, image: &[u8], kind: CartKind) {
        self.bus.borrow_mut().attach_cartridge(image, kind);
    }

    // -- Accessors

    pub fn get_bus(&self) -> Shared<Bus> {
        self.bus.clone()
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn get_cpu_mut(&mut self) -> &mut dyn Cpu {
        &mut *self.cpu
    }

    pub fn get_irq_line(&self) -> Shared<IrqLine> {
        self.irq_line.clone()
    }
}
