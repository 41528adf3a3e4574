//! Human-readable annotations for decoded events

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::event::{Direction, I2cEvent, I2cStatus};
use crate::sample::SampleRange;
use crate::sink::EventSink;

/// Annotation feeds a host can display
///
/// * Shifted: Long labels, R/W bit shifted out of addresses
/// * ShiftedShort: Same, with abbreviated labels
/// * Raw: Every address and data byte as transmitted, in hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationClass {
    Shifted,
    ShiftedShort,
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Start,
    StartRepeat,
    Stop,
    Ack,
    Nack,
    AddressRead,
    AddressWrite,
    DataRead,
    DataWrite,
}

impl Label {
    pub fn long(self) -> &'static str {
        match self {
            Label::Start => "START",
            Label::StartRepeat => "START REPEAT",
            Label::Stop => "STOP",
            Label::Ack => "ACK",
            Label::Nack => "NACK",
            Label::AddressRead => "ADDRESS READ",
            Label::AddressWrite => "ADDRESS WRITE",
            Label::DataRead => "DATA READ",
            Label::DataWrite => "DATA WRITE",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Label::Start => "S",
            Label::StartRepeat => "Sr",
            Label::Stop => "P",
            Label::Ack => "A",
            Label::Nack => "N",
            Label::AddressRead => "AR",
            Label::AddressWrite => "AW",
            Label::DataRead => "DR",
            Label::DataWrite => "DW",
        }
    }

    pub fn of_event(event: &I2cEvent) -> Label {
        match *event {
            I2cEvent::Start { repeated: false } => Label::Start,
            I2cEvent::Start { repeated: true } => Label::StartRepeat,
            I2cEvent::Stop => Label::Stop,
            I2cEvent::AddressByte { direction: Direction::Read, .. } => Label::AddressRead,
            I2cEvent::AddressByte { direction: Direction::Write, .. } => Label::AddressWrite,
            I2cEvent::DataByte { direction: Direction::Read, .. } => Label::DataRead,
            I2cEvent::DataByte { direction: Direction::Write, .. } => Label::DataWrite,
        }
    }

    pub fn of_status(status: I2cStatus) -> Label {
        match status {
            I2cStatus::Ack => Label::Ack,
            I2cStatus::Nack => Label::Nack,
        }
    }
}

/// Text of an event in the shifted feeds, e.g. `ADDRESS WRITE 0x50 ACK` or `AW 0x50 A`
pub fn shifted_text(event: &I2cEvent, short: bool) -> String {
    let pick = |label: Label| if short { label.short() } else { label.long() };

    match *event {
        I2cEvent::AddressByte { value, ack, .. } | I2cEvent::DataByte { value, ack, .. } => format!(
            "{} 0x{:02x} {}",
            pick(Label::of_event(event)),
            value,
            pick(Label::of_status(ack))
        ),
        I2cEvent::Start { .. } | I2cEvent::Stop => pick(Label::of_event(event)).to_string(),
    }
}

pub fn raw_text(raw: u8) -> String {
    format!("0x{:02x}", raw)
}

/// Sink writing one `<start>-<end> <text>` line per annotation of its class
#[derive(Debug)]
pub struct AnnotationWriter<W> {
    out: W,
    class: AnnotationClass,
}

impl<W: Write> AnnotationWriter<W> {
    pub fn new(out: W, class: AnnotationClass) -> AnnotationWriter<W> {
        AnnotationWriter { out, class }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for AnnotationWriter<W> {
    type Error = io::Error;

    fn put(&mut self, span: SampleRange, event: &I2cEvent) -> io::Result<()> {
        match self.class {
            AnnotationClass::Shifted => writeln!(self.out, "{} {}", span, shifted_text(event, false)),
            AnnotationClass::ShiftedShort => writeln!(self.out, "{} {}", span, shifted_text(event, true)),
            AnnotationClass::Raw => Ok(()),
        }
    }

    fn put_raw(&mut self, span: SampleRange, raw: u8) -> io::Result<()> {
        match self.class {
            AnnotationClass::Raw => writeln!(self.out, "{} {}", span, raw_text(raw)),
            AnnotationClass::Shifted | AnnotationClass::ShiftedShort => Ok(()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::decoder::Decoder;
    use crate::synth::Waveform;

    fn annotate(wave: &Waveform, class: AnnotationClass) -> Vec<String> {
        let mut decoder = Decoder::new(AnnotationWriter::new(Vec::new(), class));
        decoder.decode(wave.samples().iter().copied()).unwrap();
        let out = decoder.finish().unwrap().into_inner();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| l.splitn(2, ' ').nth(1).unwrap_or("").to_string())
            .collect()
    }

    fn transaction() -> Waveform {
        let mut wave = Waveform::new();
        wave.start()
            .address(0x50, Direction::Write, I2cStatus::Ack)
            .byte(0x0F, I2cStatus::Ack)
            .start()
            .address(0x50, Direction::Read, I2cStatus::Ack)
            .byte(0xFF, I2cStatus::Nack)
            .stop();
        wave
    }

    #[test]
    fn test_shifted_long() {
        assert_eq!(
            annotate(&transaction(), AnnotationClass::Shifted),
            vec![
                "START",
                "ADDRESS WRITE 0x50 ACK",
                "DATA WRITE 0x0f ACK",
                "START REPEAT",
                "ADDRESS READ 0x50 ACK",
                "DATA READ 0xff NACK",
                "STOP",
            ]
        );
    }

    #[test]
    fn test_shifted_short() {
        assert_eq!(
            annotate(&transaction(), AnnotationClass::ShiftedShort),
            vec!["S", "AW 0x50 A", "DW 0x0f A", "Sr", "AR 0x50 A", "DR 0xff N", "P"]
        );
    }

    #[test]
    fn test_raw_keeps_rw_bit() {
        assert_eq!(
            annotate(&transaction(), AnnotationClass::Raw),
            vec!["0xa0", "0x0f", "0xa1", "0xff"]
        );
    }

    #[test]
    fn test_line_carries_span() {
        let mut wave = Waveform::new();
        wave.start();
        let mut decoder = Decoder::new(AnnotationWriter::new(Vec::new(), AnnotationClass::Shifted));
        decoder.decode(wave.into_samples()).unwrap();
        let out = String::from_utf8(decoder.finish().unwrap().into_inner()).unwrap();
        assert_eq!(out, "1-1 START\n");
    }
}
