// This file is part of argon8.
// Copyright (c) 2016-2019 Sebastian Jastrzebski. All rights reserved.
// Licensed under the GPLv3. See LICENSE file in the project root for full license text.

use byteorder::{ByteOrder, LittleEndian};

// Snapshots use a frozen layout: integer fields as 4-byte little-endian
// values, memory arrays as raw byte runs. Callers size buffers with
// `Machine::snapshot_size` before serializing.

pub struct SnapshotWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SnapshotWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf[self.pos] = value;
        self.pos += 1;
    }

    pub fn put_i32(&mut self, value: i32) {
        LittleEndian::write_i32(&mut self.buf[self.pos..self.pos + 4], value);
        self.pos += 4;
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

pub struct SnapshotReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SnapshotReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn get_u8(&mut self) -> u8 {
        let value = self.buf[self.pos];
        self.pos += 1;
        value
    }

    pub fn get_i32(&mut self) -> i32 {
        let value = LittleEndian::read_i32(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        value
    }

    pub fn get_bytes(&mut self, out: &mut [u8]) {
        out.copy_from_slice(&self.buf[self.pos..self.pos + out.len()]);
        self.pos += out.len();
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut buf = [0u8; 16];
        let mut writer = SnapshotWriter::new(&mut buf);
        writer.put_i32(-123456);
        writer.put_u8(0x42);
        writer.put_bytes(&[1, 2, 3]);
        assert_eq!(8, writer.position());

        let mut reader = SnapshotReader::new(&buf);
        assert_eq!(-123456, reader.get_i32());
        assert_eq!(0x42, reader.get_u8());
        let mut out = [0u8; 3];
        reader.get_bytes(&mut out);
        assert_eq!([1, 2, 3], out);
    }

    #[test]
    fn integers_are_little_endian() {
        let mut buf = [0u8; 4];
        let mut writer = SnapshotWriter::new(&mut buf);
        writer.put_i32(0x0102_0304);
        assert_eq!([0x04, 0x03, 0x02, 0x01], buf);
    }
}
