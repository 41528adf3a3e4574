//! Classification of the transition between two consecutive samples

use crate::sample::Sample;

/// Behavior of a single line between two samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Rising,
    Falling,
    Steady,
}

impl LineState {
    fn between(old: bool, new: bool) -> LineState {
        match (old, new) {
            (false, false) => LineState::Steady,
            (false, true)  => LineState::Rising,
            (true, false)  => LineState::Falling,
            (true, true)   => LineState::Steady,
        }
    }
}

/// What SCL and SDA did between the previous and the current sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub scl: LineState,
    pub sda: LineState,
    /// SCL level of the current sample
    pub scl_high: bool,
}

impl Transition {
    pub fn between(previous: &Sample, current: &Sample) -> Transition {
        Transition {
            scl: LineState::between(previous.scl, current.scl),
            sda: LineState::between(previous.sda, current.sda),
            scl_high: current.scl,
        }
    }

    /// START condition (S): SDA falling while SCL is high
    pub fn is_start(&self) -> bool {
        self.sda == LineState::Falling && self.scl_high
    }

    /// STOP condition (P): SDA rising while SCL is high
    pub fn is_stop(&self) -> bool {
        self.sda == LineState::Rising && self.scl_high
    }

    /// Receiver samples SDA on the rising edge of SCL, whatever SDA is doing
    pub fn is_data_bit(&self) -> bool {
        self.scl == LineState::Rising
    }
}
