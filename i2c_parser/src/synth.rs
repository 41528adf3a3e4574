//! Synthesis of well-formed bus waveforms
//!
//! Produces the SCL/SDA samples a master and its slave would put on the
//! wire, one sample per line change. SDA only moves while SCL is low, except
//! for START and STOP conditions.

use crate::event::{Direction, I2cStatus};
use crate::sample::Sample;

/// Builder for a sequence of bus samples, starting from an idle bus
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<Sample>,
    scl: bool,
    sda: bool,
}

impl Default for Waveform {
    fn default() -> Waveform {
        Waveform::new()
    }
}

impl Waveform {
    /// Begin with a single idle sample, both lines pulled high
    pub fn new() -> Waveform {
        let mut wave = Waveform {
            samples: Vec::new(),
            scl: true,
            sda: true,
        };
        wave.push(true, true);
        wave
    }

    fn push(&mut self, scl: bool, sda: bool) {
        let index = self.samples.len() as u64;
        self.samples.push(Sample::new(index, scl, sda));
        self.scl = scl;
        self.sda = sda;
    }

    fn clock_low(&mut self) {
        if self.scl {
            let sda = self.sda;
            self.push(false, sda);
        }
    }

    /// Hold the current levels for `count` more samples
    pub fn idle(&mut self, count: usize) -> &mut Waveform {
        for _ in 0..count {
            let (scl, sda) = (self.scl, self.sda);
            self.push(scl, sda);
        }
        self
    }

    /// START condition, or repeated START when the bus is not idle
    pub fn start(&mut self) -> &mut Waveform {
        if !(self.scl && self.sda) {
            self.clock_low();
            self.push(false, true);
            self.push(true, true);
        }
        self.push(true, false);
        self
    }

    /// One data bit, sampled by receivers as SCL rises
    pub fn bit(&mut self, bit: bool) -> &mut Waveform {
        self.clock_low();
        self.push(false, bit);
        self.push(true, bit);
        self
    }

    /// 8 bits MSB-first followed by the ACK/NACK bit
    pub fn byte(&mut self, byte: u8, status: I2cStatus) -> &mut Waveform {
        for i in 0..8 {
            self.bit(byte & (0x80 >> i) != 0);
        }
        self.bit(status == I2cStatus::Nack)
    }

    /// 7-bit address with the R/W bit appended
    pub fn address(&mut self, address: u8, direction: Direction, status: I2cStatus) -> &mut Waveform {
        self.byte(((address & 0x7F) << 1) | direction.rw_bit(), status)
    }

    /// STOP condition
    pub fn stop(&mut self) -> &mut Waveform {
        self.clock_low();
        self.push(false, false);
        self.push(true, false);
        self.push(true, true);
        self
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}
