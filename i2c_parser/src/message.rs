//! Grouping of events into START..STOP messages

use serde::Serialize;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::io::{self, Write};
use tracing::warn;

use crate::event::{Direction, I2cEvent, I2cStatus};
use crate::sample::SampleRange;
use crate::sink::EventSink;

/// A single byte of I2C Data, including ACK or NACK state
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct I2cByte {
    pub data: u8,
    pub status: I2cStatus,
}

/// One address byte and the data bytes following it, up to the next
///   START or STOP
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct I2cTransfer {
    pub address: u8,
    pub direction: Direction,
    pub address_status: I2cStatus,
    pub bytes: Vec<I2cByte>,
}

impl I2cTransfer {
    /// The address byte as it appeared on the wire
    pub fn raw_address(&self) -> u8 {
        (self.address << 1) | self.direction.rw_bit()
    }
}

/// Structure containing a complete I2C message, from START to STOP.
///
/// Every repeated START begins a new transfer within the same message.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct I2cMessage {
    pub transfers: Vec<I2cTransfer>,
}

impl I2cMessage {
    /// Obtain only the data bytes from an I2C Message, discarding addresses,
    ///   ACKs and NACKs
    pub fn get_payload(&self) -> Vec<u8> {
        self.transfers
            .iter()
            .flat_map(|t| t.bytes.iter().map(|b| b.data))
            .collect()
    }
}

fn status_mark(status: I2cStatus) -> &'static str {
    match status {
        I2cStatus::Ack => "+",
        I2cStatus::Nack => "-",
    }
}

impl fmt::Display for I2cMessage {
    /// One `[..]` group per transfer: raw address byte, then data bytes
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for transfer in &self.transfers {
            write!(f, "[{:02X}{}", transfer.raw_address(), status_mark(transfer.address_status))?;
            for byte in &transfer.bytes {
                write!(f, "{:02X}{}", byte.data, status_mark(byte.status))?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Sink assembling events into messages, completed on every STOP
#[derive(Debug, Default)]
pub struct MessageCollector {
    current: Option<I2cMessage>,
    complete: VecDeque<I2cMessage>,
}

impl MessageCollector {
    pub fn new() -> MessageCollector {
        MessageCollector::default()
    }

    /// Oldest completed message, if any
    pub fn pop(&mut self) -> Option<I2cMessage> {
        self.complete.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = I2cMessage> + '_ {
        self.complete.drain(..)
    }

    /// A message that was started but has not seen its STOP yet
    pub fn take_partial(&mut self) -> Option<I2cMessage> {
        self.current.take()
    }
}

impl EventSink for MessageCollector {
    type Error = Infallible;

    fn put(&mut self, span: SampleRange, event: &I2cEvent) -> Result<(), Infallible> {
        match *event {
            I2cEvent::Start { .. } => {
                self.current.get_or_insert_with(I2cMessage::default);
            }
            I2cEvent::AddressByte { value, direction, ack } => {
                self.current
                    .get_or_insert_with(I2cMessage::default)
                    .transfers
                    .push(I2cTransfer {
                        address: value,
                        direction,
                        address_status: ack,
                        bytes: Vec::new(),
                    });
            }
            I2cEvent::DataByte { value, ack, .. } => {
                let transfer = self.current.as_mut().and_then(|m| m.transfers.last_mut());
                match transfer {
                    Some(transfer) => transfer.bytes.push(I2cByte { data: value, status: ack }),
                    None => {
                        warn!(
                            start = span.start,
                            end = span.end,
                            data = value,
                            "data byte outside of an addressed transfer, dropped"
                        );
                    }
                }
            }
            I2cEvent::Stop => {
                if let Some(message) = self.current.take() {
                    self.complete.push_back(message);
                }
            }
        }
        Ok(())
    }
}

/// Sink printing one line per message as soon as its STOP arrives
#[derive(Debug)]
pub struct MessageWriter<W> {
    out: W,
    collector: MessageCollector,
}

impl<W: Write> MessageWriter<W> {
    pub fn new(out: W) -> MessageWriter<W> {
        MessageWriter {
            out,
            collector: MessageCollector::new(),
        }
    }
}

impl<W: Write> EventSink for MessageWriter<W> {
    type Error = io::Error;

    fn put(&mut self, span: SampleRange, event: &I2cEvent) -> io::Result<()> {
        match self.collector.put(span, event) {
            Ok(()) => {}
            Err(never) => match never {},
        }
        for message in self.collector.drain() {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
