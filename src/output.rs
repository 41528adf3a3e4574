//! Sinks writing decoded traffic to stdout

use std::io::{self, Write};

use i2c_parser::{AnnotationWriter, EventSink, I2cEvent, MessageWriter, SampleRange};
use serde::Serialize;

use crate::config::OutputFormat;

pub type BoxedSink<'a> = Box<dyn EventSink<Error = io::Error> + 'a>;

pub fn make_sink<'a, W: Write + 'a>(format: OutputFormat, out: W) -> BoxedSink<'a> {
    match format.annotation_class() {
        Some(class) => Box::new(AnnotationWriter::new(out, class)),
        None => match format {
            OutputFormat::Json => Box::new(JsonLines::new(out)),
            _ => Box::new(MessageWriter::new(out)),
        },
    }
}

#[derive(Serialize)]
struct JsonRecord<'e> {
    start: u64,
    end: u64,
    #[serde(flatten)]
    event: &'e I2cEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<u8>,
}

/// One JSON object per line and event
pub struct JsonLines<W> {
    out: W,
    raw: Option<u8>,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> JsonLines<W> {
        JsonLines { out, raw: None }
    }
}

impl<W: Write> EventSink for JsonLines<W> {
    type Error = io::Error;

    fn put(&mut self, span: SampleRange, event: &I2cEvent) -> io::Result<()> {
        let record = JsonRecord {
            start: span.start,
            end: span.end,
            event,
            raw: self.raw.take(),
        };
        serde_json::to_writer(&mut self.out, &record)?;
        writeln!(self.out)
    }

    fn put_raw(&mut self, _span: SampleRange, raw: u8) -> io::Result<()> {
        self.raw = Some(raw);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
