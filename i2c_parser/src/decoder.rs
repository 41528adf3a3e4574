//! Driver feeding samples through an engine into a sink

use tracing::warn;

use crate::config::{ConfigError, DecoderOptions};
use crate::engine::I2cEngine;
use crate::sample::Sample;
use crate::sink::EventSink;

/// An engine composed with the sink its events go to
#[derive(Debug)]
pub struct Decoder<S> {
    engine: I2cEngine,
    sink: S,
}

impl<S: EventSink> Decoder<S> {
    pub fn new(sink: S) -> Decoder<S> {
        Decoder {
            engine: I2cEngine::new(),
            sink,
        }
    }

    pub fn with_options(options: &DecoderOptions, sink: S) -> Result<Decoder<S>, ConfigError> {
        Ok(Decoder {
            engine: I2cEngine::with_options(options)?,
            sink,
        })
    }

    /// Process one sample, handing any resulting event to the sink
    pub fn feed(&mut self, sample: Sample) -> Result<(), S::Error> {
        if let Some(decoded) = self.engine.update(sample) {
            if let Some(raw) = decoded.raw {
                self.sink.put_raw(decoded.span, raw)?;
            }
            self.sink.put(decoded.span, &decoded.event)?;
        }
        Ok(())
    }

    pub fn decode<I>(&mut self, samples: I) -> Result<(), S::Error>
    where
        I: IntoIterator<Item = Sample>,
    {
        for sample in samples {
            self.feed(sample)?;
        }
        Ok(())
    }

    pub fn engine(&self) -> &I2cEngine {
        &self.engine
    }

    /// End of input: flushes the sink and hands it back. A byte still being
    ///   gathered is dropped without an event.
    pub fn finish(mut self) -> Result<S, S::Error> {
        let pending = self.engine.pending_bits();
        if pending > 0 {
            warn!(pending_bits = pending, "input ended mid-byte, partial byte dropped");
        }
        self.sink.flush()?;
        Ok(self.sink)
    }
}
