//! # I2C Parsing State Machine Library
//!
//! Decodes sampled SCL and SDA levels into I2C bus events: START, repeated
//! START, address bytes with their R/W direction, data bytes, ACK/NACK and
//! STOP.
//!
//! ```
//! use i2c_parser::{Decoder, Direction, I2cEvent, I2cStatus, SampleRange, Waveform};
//!
//! let mut wave = Waveform::new();
//! wave.start()
//!     .address(0x50, Direction::Write, I2cStatus::Ack)
//!     .byte(0xFF, I2cStatus::Nack)
//!     .stop();
//!
//! let mut decoder = Decoder::new(Vec::<(SampleRange, I2cEvent)>::new());
//! decoder.decode(wave.into_samples()).unwrap();
//! let events: Vec<I2cEvent> = decoder.finish().unwrap().into_iter().map(|(_, e)| e).collect();
//!
//! assert_eq!(events[1], I2cEvent::AddressByte {
//!     value: 0x50,
//!     direction: Direction::Write,
//!     ack: I2cStatus::Ack,
//! });
//! ```

pub mod annotation;
pub mod assembler;
pub mod config;
pub mod decoder;
pub mod edge;
pub mod engine;
pub mod event;
pub mod message;
pub mod meta;
pub mod sample;
pub mod sink;
pub mod synth;

pub use annotation::{AnnotationClass, AnnotationWriter};
pub use config::{ConfigError, DecoderOptions};
pub use decoder::Decoder;
pub use engine::{Decoded, Events, I2cEngine, Phase};
pub use event::{Direction, I2cEvent, I2cStatus};
pub use message::{I2cByte, I2cMessage, I2cTransfer, MessageCollector, MessageWriter};
pub use meta::DECODER;
pub use sample::{Sample, SampleRange};
pub use sink::EventSink;
pub use synth::Waveform;
