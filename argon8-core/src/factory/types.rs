// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use crate::factory::system_model::VideoMode;
use crate::util::{IrqLine, Shared, SnapshotReader, SnapshotWriter};

/// Outcome of executing one instruction. The cycle cost of a special
/// opcode is not reported by the CPU; the scheduler charges a fixed cost
/// and hands the opcode to the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Normal(i32),
    Special(u8),
}

/// Addressable represents the CPU-visible bus. Reads take `&mut self`
/// because several I/O registers have read side effects (palette cursor
/// advance, status acknowledge).
pub trait Addressable {
    /// Read byte from the specified address.
    fn read(&mut self, address: u16) -> u8;
    /// Write byte to the specified address.
    fn write(&mut self, address: u16, value: u8);
}

/// CPU is responsible for decoding and executing instructions. It is an
/// opaque collaborator: the machine core only sees the per-instruction
/// cycle cost and drives the interrupt line it was constructed with.
pub trait Cpu {
    /// The core method of the cpu, decodes and executes one instruction.
    fn step(&mut self) -> Step;
    /// Handle reset signal.
    fn reset(&mut self);
    // -- Persistence
    fn snapshot_size(&self) -> usize;
    fn serialize(&self, writer: &mut SnapshotWriter);
    fn deserialize(&mut self, reader: &mut SnapshotReader);
}

/// VideoSink is the renderer the machine core pushes scanout events to.
/// `draw_segment` is invoked between instructions while the beam is inside
/// the display window and receives the visible video page along with the
/// current intra-line cycle.
pub trait VideoSink {
    fn set_mode(&mut self, mode: VideoMode);
    fn set_palette(&mut self, index: usize, r: u8, g: u8, b: u8);
    fn draw_segment(&mut self, vram: &[u8], line_cycle: i32);
    fn next_line(&mut self);
    // -- Persistence
    fn snapshot_size(&self) -> usize;
    fn serialize(&self, writer: &mut SnapshotWriter);
    fn deserialize(&mut self, reader: &mut SnapshotReader);
}

/// SystemFactory constructs the external collaborators of the machine.
/// Interactions are managed through separate I/O state provided as input
/// to each constructor so that implementations can be swapped out without
/// coupling them to the core.
pub trait SystemFactory {
    /// Constructs CPU.
    ///
    /// # Dependencies
    /// `mem` - memory bus
    /// # Signals
    /// `irq_line` - interrupt request input, sampled at instruction
    /// boundaries
    fn new_cpu(&self, mem: Shared<dyn Addressable>, irq_line: Shared<IrqLine>) -> Box<dyn Cpu>;

    /// Constructs the video renderer.
    fn new_video(&self) -> Shared<dyn VideoSink>;
}
