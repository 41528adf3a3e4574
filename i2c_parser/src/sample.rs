use serde::{Deserialize, Serialize};
use std::fmt;

/// One observation of the bus: SCL and SDA levels at a sample index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub index: u64,
    pub scl: bool,
    pub sda: bool,
}

impl Sample {
    pub fn new(index: u64, scl: bool, sda: bool) -> Sample {
        Sample { index, scl, sda }
    }
}

/// Inclusive range of sample indices an event was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRange {
    pub start: u64,
    pub end: u64,
}

impl SampleRange {
    pub fn new(start: u64, end: u64) -> SampleRange {
        SampleRange { start, end }
    }

    /// A range covering exactly one sample
    pub fn at(index: u64) -> SampleRange {
        SampleRange { start: index, end: index }
    }
}

impl fmt::Display for SampleRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
