//! The bus state machine

use tracing::{debug, trace};

use crate::assembler::{ByteAssembler, Group};
use crate::config::{ConfigError, DecoderOptions};
use crate::edge::Transition;
use crate::event::{Direction, I2cEvent};
use crate::sample::{Sample, SampleRange};

/// What the engine is waiting for
///
/// * FindStart: Bus idle, waiting for a START condition
/// * FindAddress: START seen, gathering the address byte
/// * FindData: Address decoded, gathering data bytes until START or STOP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FindStart,
    FindAddress,
    FindData(Direction),
}

/// An event along with where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub span: SampleRange,
    pub event: I2cEvent,
    /// The group's 8 bits before the R/W bit is shifted out, for address and data events
    pub raw: Option<u8>,
}

/// Structure for decoding I2C events from raw SDA and SCL samples
#[derive(Debug)]
pub struct I2cEngine {
    phase: Phase,
    previous: Option<Sample>,
    assembler: ByteAssembler,
    repeat_start: bool,
}

impl Default for I2cEngine {
    fn default() -> I2cEngine {
        I2cEngine::new()
    }
}

impl I2cEngine {
    /// Create a new I2cEngine waiting for a START condition
    pub fn new() -> I2cEngine {
        I2cEngine {
            phase: Phase::FindStart,
            previous: None,
            assembler: ByteAssembler::new(),
            repeat_start: false,
        }
    }

    pub fn with_options(options: &DecoderOptions) -> Result<I2cEngine, ConfigError> {
        options.validate()?;
        Ok(I2cEngine::new())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Bits of an address or data byte gathered so far
    pub fn pending_bits(&self) -> u8 {
        match self.phase {
            Phase::FindStart => 0,
            Phase::FindAddress | Phase::FindData(_) => self.assembler.pending_bits(),
        }
    }

    /// Process one sample of SDA and SCL.
    ///
    /// The first sample only seeds the line levels. Every later sample yields
    ///   at most one event.
    pub fn update(&mut self, sample: Sample) -> Option<Decoded> {
        let previous = self.previous.replace(sample)?;
        let transition = Transition::between(&previous, &sample);

        match self.phase {
            Phase::FindStart => {
                if transition.is_start() {
                    return Some(self.found_start(&sample));
                }
            }
            Phase::FindAddress => {
                if transition.is_data_bit() {
                    return self.found_address(&sample);
                }
            }
            Phase::FindData(direction) => {
                // Data bits win over START and STOP on the same sample
                if transition.is_data_bit() {
                    if transition.is_start() || transition.is_stop() {
                        debug!(
                            index = sample.index,
                            start = transition.is_start(),
                            stop = transition.is_stop(),
                            "SCL and SDA changed together, sampling as data bit"
                        );
                    }
                    return self.found_data(direction, &sample);
                } else if transition.is_start() {
                    return Some(self.found_start(&sample));
                } else if transition.is_stop() {
                    return Some(self.found_stop(&sample));
                }
            }
        }

        None
    }

    /// Lazily decode a sequence of samples, consuming the engine
    pub fn events<I>(self, samples: I) -> Events<I::IntoIter>
    where
        I: IntoIterator<Item = Sample>,
    {
        Events {
            engine: self,
            samples: samples.into_iter(),
        }
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            trace!(from = ?self.phase, to = ?phase, "phase change");
        }
        self.phase = phase;
    }

    fn emit(&self, span: SampleRange, event: I2cEvent, raw: Option<u8>) -> Decoded {
        debug!(start = span.start, end = span.end, ?event, "decoded");
        Decoded { span, event, raw }
    }

    fn found_start(&mut self, sample: &Sample) -> Decoded {
        let event = I2cEvent::Start {
            repeated: self.repeat_start,
        };
        self.repeat_start = true;
        self.assembler.reset();
        self.enter(Phase::FindAddress);
        self.emit(SampleRange::at(sample.index), event, None)
    }

    fn found_address(&mut self, sample: &Sample) -> Option<Decoded> {
        let group: Group = self.assembler.accumulate(sample.index, sample.sda)?;
        let (value, direction) = group.as_address();
        self.enter(Phase::FindData(direction));
        let event = I2cEvent::AddressByte {
            value,
            direction,
            ack: group.ack,
        };
        Some(self.emit(group.span, event, Some(group.raw_byte)))
    }

    fn found_data(&mut self, direction: Direction, sample: &Sample) -> Option<Decoded> {
        let group = self.assembler.accumulate(sample.index, sample.sda)?;
        let event = I2cEvent::DataByte {
            value: group.raw_byte,
            direction,
            ack: group.ack,
        };
        Some(self.emit(group.span, event, Some(group.raw_byte)))
    }

    fn found_stop(&mut self, sample: &Sample) -> Decoded {
        self.repeat_start = false;
        self.enter(Phase::FindStart);
        self.emit(SampleRange::at(sample.index), I2cEvent::Stop, None)
    }
}

/// Iterator over the events decoded from a sample iterator
#[derive(Debug)]
pub struct Events<I> {
    engine: I2cEngine,
    samples: I,
}

impl<I> Events<I> {
    /// Recover the engine, e.g. to check for a truncated trailing byte
    pub fn into_engine(self) -> I2cEngine {
        self.engine
    }
}

impl<I: Iterator<Item = Sample>> Iterator for Events<I> {
    type Item = Decoded;

    fn next(&mut self) -> Option<Decoded> {
        for sample in self.samples.by_ref() {
            if let Some(decoded) = self.engine.update(sample) {
                return Some(decoded);
            }
        }
        None
    }
}
