//! End-to-end decoding of synthesized bus traffic

use i2c_parser::{Direction, I2cEngine, I2cEvent, I2cStatus, Sample, Waveform};

fn decode(samples: &[Sample]) -> Vec<I2cEvent> {
    I2cEngine::new()
        .events(samples.iter().copied())
        .map(|d| d.event)
        .collect()
}

fn address(value: u8, direction: Direction, ack: I2cStatus) -> I2cEvent {
    I2cEvent::AddressByte { value, direction, ack }
}

fn data(value: u8, direction: Direction, ack: I2cStatus) -> I2cEvent {
    I2cEvent::DataByte { value, direction, ack }
}

// ============================================================================
// Transactions
// ============================================================================

#[test]
fn test_write_one_byte_nacked() {
    let mut wave = Waveform::new();
    wave.start()
        .byte(0xA0, I2cStatus::Ack)
        .byte(0xFF, I2cStatus::Nack)
        .stop();

    assert_eq!(
        decode(wave.samples()),
        vec![
            I2cEvent::Start { repeated: false },
            address(0x50, Direction::Write, I2cStatus::Ack),
            data(0xFF, Direction::Write, I2cStatus::Nack),
            I2cEvent::Stop,
        ]
    );
}

#[test]
fn test_read_two_bytes() {
    let mut wave = Waveform::new();
    wave.start()
        .byte(0x21, I2cStatus::Ack)
        .byte(0x00, I2cStatus::Ack)
        .byte(0x01, I2cStatus::Ack)
        .stop();

    assert_eq!(
        decode(wave.samples()),
        vec![
            I2cEvent::Start { repeated: false },
            address(0x10, Direction::Read, I2cStatus::Ack),
            data(0x00, Direction::Read, I2cStatus::Ack),
            data(0x01, Direction::Read, I2cStatus::Ack),
            I2cEvent::Stop,
        ]
    );
}

#[test]
fn test_repeated_start_without_stop() {
    let mut wave = Waveform::new();
    wave.start()
        .address(0x68, Direction::Write, I2cStatus::Ack)
        .byte(0x75, I2cStatus::Ack)
        .start()
        .address(0x68, Direction::Read, I2cStatus::Ack)
        .stop();

    assert_eq!(
        decode(wave.samples()),
        vec![
            I2cEvent::Start { repeated: false },
            address(0x68, Direction::Write, I2cStatus::Ack),
            data(0x75, Direction::Write, I2cStatus::Ack),
            I2cEvent::Start { repeated: true },
            address(0x68, Direction::Read, I2cStatus::Ack),
            I2cEvent::Stop,
        ]
    );
}

#[test]
fn test_start_after_stop_is_not_repeated() {
    let mut wave = Waveform::new();
    wave.start()
        .address(0x01, Direction::Write, I2cStatus::Ack)
        .stop()
        .idle(5)
        .start()
        .address(0x02, Direction::Read, I2cStatus::Nack)
        .stop();

    let starts: Vec<I2cEvent> = decode(wave.samples())
        .into_iter()
        .filter(|e| matches!(e, I2cEvent::Start { .. }))
        .collect();
    assert_eq!(
        starts,
        vec![
            I2cEvent::Start { repeated: false },
            I2cEvent::Start { repeated: false },
        ]
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_first_sample_neutral() {
    let mut wave = Waveform::new();
    wave.start().address(0x50, Direction::Write, I2cStatus::Ack).stop();
    let samples = wave.into_samples();

    // Dropping the idle seed makes the START sample the seed instead
    let events = decode(&samples[1..]);
    assert!(!events.contains(&I2cEvent::Start { repeated: false }));
    assert!(events.is_empty());

    assert!(decode(&samples[..1]).is_empty());
}

#[test]
fn test_events_follow_their_samples_in_order() {
    let mut wave = Waveform::new();
    wave.start()
        .address(0x3C, Direction::Write, I2cStatus::Ack)
        .byte(0x00, I2cStatus::Ack)
        .byte(0xAF, I2cStatus::Ack)
        .start()
        .address(0x3C, Direction::Read, I2cStatus::Ack)
        .byte(0x12, I2cStatus::Nack)
        .stop();
    let samples = wave.into_samples();

    let mut last_end = 0;
    let decoded: Vec<_> = I2cEngine::new().events(samples.iter().copied()).collect();
    assert_eq!(decoded.len(), 8);
    for d in &decoded {
        assert!(d.span.start <= d.span.end);
        assert!(d.span.start >= last_end);
        assert!(d.span.end < samples.len() as u64);
        last_end = d.span.end;
    }
}

#[test]
fn test_data_direction_tracks_latest_address() {
    let mut wave = Waveform::new();
    wave.start()
        .address(0x11, Direction::Read, I2cStatus::Ack)
        .byte(0x01, I2cStatus::Ack)
        .start()
        .address(0x11, Direction::Write, I2cStatus::Ack)
        .byte(0x02, I2cStatus::Ack)
        .stop();

    let mut latest = None;
    for event in decode(wave.samples()) {
        match event {
            I2cEvent::Start { .. } => latest = None,
            I2cEvent::AddressByte { .. } => latest = event.direction(),
            I2cEvent::DataByte { .. } => assert_eq!(event.direction(), latest),
            I2cEvent::Stop => assert_eq!(event.direction(), None),
        }
    }
}

#[test]
fn test_ack_polarity_per_byte() {
    let mut wave = Waveform::new();
    wave.start()
        .address(0x7F, Direction::Write, I2cStatus::Nack)
        .byte(0x55, I2cStatus::Ack)
        .byte(0xAA, I2cStatus::Nack)
        .stop();

    let acks: Vec<Option<I2cStatus>> = decode(wave.samples()).iter().map(|e| e.ack()).collect();
    assert_eq!(
        acks,
        vec![
            None,
            Some(I2cStatus::Nack),
            Some(I2cStatus::Ack),
            Some(I2cStatus::Nack),
            None,
        ]
    );
}

#[test]
fn test_every_address_fits_seven_bits() {
    for value in 0..=0x7F {
        let mut wave = Waveform::new();
        wave.start().address(value, Direction::Read, I2cStatus::Ack).stop();
        assert_eq!(
            decode(wave.samples())[1],
            address(value, Direction::Read, I2cStatus::Ack)
        );
    }
}

#[test]
fn test_truncated_trailing_byte_is_dropped() {
    let mut wave = Waveform::new();
    wave.start()
        .address(0x50, Direction::Write, I2cStatus::Ack)
        .bit(true)
        .bit(false)
        .bit(true);
    let samples = wave.into_samples();

    let mut events = I2cEngine::new().events(samples);
    assert_eq!(events.by_ref().count(), 2);
    assert_eq!(events.into_engine().pending_bits(), 3);
}
