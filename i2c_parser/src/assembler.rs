//! Collection of 8 data bits plus the ACK/NACK bit

use crate::event::{Direction, I2cStatus};
use crate::sample::SampleRange;

/// Bits per group: 8 data bits, MSB-first, then ACK/NACK
pub const GROUP_BITS: u8 = 9;

/// A completed 9-bit group with the ACK/NACK bit shifted out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    /// The 8 bits as seen on the wire, R/W bit included for address bytes
    pub raw_byte: u8,
    pub ack: I2cStatus,
    /// From the first data bit to the ACK/NACK bit
    pub span: SampleRange,
}

impl Group {
    /// Split an address byte into its 7-bit address and direction
    pub fn as_address(&self) -> (u8, Direction) {
        (self.raw_byte >> 1, Direction::from_rw_bit(self.raw_byte & 1 == 1))
    }
}

/// Shift register gathering data bits until a group is complete
#[derive(Debug, Default)]
pub struct ByteAssembler {
    accumulator: u16,
    bit_count: u8,
    first_index: u64,
}

impl ByteAssembler {
    pub fn new() -> ByteAssembler {
        ByteAssembler::default()
    }

    /// Shift in one SDA bit sampled at `index`.
    ///
    /// Returns the group once the 9th bit arrives, and starts over empty.
    pub fn accumulate(&mut self, index: u64, sda: bool) -> Option<Group> {
        if self.bit_count == 0 {
            self.first_index = index;
        }

        self.accumulator = (self.accumulator << 1) | u16::from(sda);
        self.bit_count += 1;

        if self.bit_count < GROUP_BITS {
            return None;
        }

        let group = Group {
            raw_byte: (self.accumulator >> 1) as u8,
            ack: I2cStatus::from_bit(self.accumulator & 1 == 1),
            span: SampleRange::new(self.first_index, index),
        };
        self.reset();
        Some(group)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.bit_count = 0;
    }

    /// Bits gathered towards the next group
    pub fn pending_bits(&self) -> u8 {
        self.bit_count
    }
}
