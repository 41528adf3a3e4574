use serde::{Deserialize, Serialize};

/// Representation of ACK/NACK bit after every 8 bits of data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum I2cStatus {
    Ack,
    Nack,
}

impl I2cStatus {
    /// SDA low on the 9th clock acknowledges, high does not
    pub fn from_bit(sda: bool) -> I2cStatus {
        if sda {
            I2cStatus::Nack
        } else {
            I2cStatus::Ack
        }
    }
}

/// Transfer direction, carried in the low bit of every address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Write,
    Read,
}

impl Direction {
    pub fn from_rw_bit(rw: bool) -> Direction {
        if rw {
            Direction::Read
        } else {
            Direction::Write
        }
    }

    pub fn rw_bit(self) -> u8 {
        match self {
            Direction::Write => 0,
            Direction::Read => 1,
        }
    }
}

/// A decoded bus event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum I2cEvent {
    /// START condition. `repeated` is set when no STOP was seen since the last START
    Start { repeated: bool },
    /// 7-bit slave address, R/W bit already shifted out
    AddressByte { value: u8, direction: Direction, ack: I2cStatus },
    /// Payload byte; direction is that of the preceding address byte
    DataByte { value: u8, direction: Direction, ack: I2cStatus },
    Stop,
}

impl I2cEvent {
    pub fn ack(&self) -> Option<I2cStatus> {
        match *self {
            I2cEvent::AddressByte { ack, .. } | I2cEvent::DataByte { ack, .. } => Some(ack),
            I2cEvent::Start { .. } | I2cEvent::Stop => None,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match *self {
            I2cEvent::AddressByte { direction, .. } | I2cEvent::DataByte { direction, .. } => {
                Some(direction)
            }
            I2cEvent::Start { .. } | I2cEvent::Stop => None,
        }
    }
}
