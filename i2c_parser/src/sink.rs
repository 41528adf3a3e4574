//! EventSink trait - decoder output interface

use std::convert::Infallible;

use crate::event::I2cEvent;
use crate::sample::SampleRange;

/// Receives decoded events in the order they occurred on the bus
pub trait EventSink {
    type Error;

    /// Called once per event with the samples it was derived from
    fn put(&mut self, span: SampleRange, event: &I2cEvent) -> Result<(), Self::Error>;

    /// Called for every completed address or data byte, before `put`, with
    ///   the 8 bits as transmitted (R/W bit still in place for addresses)
    fn put_raw(&mut self, span: SampleRange, raw: u8) -> Result<(), Self::Error> {
        let _ = (span, raw);
        Ok(())
    }

    /// Flush anything buffered by the sink
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl EventSink for Vec<(SampleRange, I2cEvent)> {
    type Error = Infallible;

    fn put(&mut self, span: SampleRange, event: &I2cEvent) -> Result<(), Infallible> {
        self.push((span, *event));
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    type Error = S::Error;

    fn put(&mut self, span: SampleRange, event: &I2cEvent) -> Result<(), S::Error> {
        (**self).put(span, event)
    }

    fn put_raw(&mut self, span: SampleRange, raw: u8) -> Result<(), S::Error> {
        (**self).put_raw(span, raw)
    }

    fn flush(&mut self) -> Result<(), S::Error> {
        (**self).flush()
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    type Error = S::Error;

    fn put(&mut self, span: SampleRange, event: &I2cEvent) -> Result<(), S::Error> {
        (**self).put(span, event)
    }

    fn put_raw(&mut self, span: SampleRange, raw: u8) -> Result<(), S::Error> {
        (**self).put_raw(span, raw)
    }

    fn flush(&mut self) -> Result<(), S::Error> {
        (**self).flush()
    }
}
