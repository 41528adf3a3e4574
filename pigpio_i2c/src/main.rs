//! Live I2C decoding from a pigpio notification pipe.
//!
//! ```text
//! pigs no            # -> 0
//! pigs nb 0 0xC      # watch GPIO 2 (SDA) and 3 (SCL)
//! pigpio_i2c 3 2 --input /dev/pigpio0
//! ```

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use anyhow::{Context as _, Result};
use clap::Parser;
use futures::executor::block_on;
use futures::future;
use futures::stream::{Stream, TryStreamExt};
use i2c_parser::{AnnotationClass, AnnotationWriter, Decoder, EventSink, MessageWriter, Sample};
use tracing::{debug, info, trace};

/// Size of pigpio's gpioReport_t
const REPORT_SIZE: usize = 12;

type GpioBuffer = [u8; REPORT_SIZE];

/// Watchdog timeout report, levels unchanged
const NTFY_FLAGS_WDOG: u16 = 1 << 5;
/// Keep-alive report, levels unchanged
const NTFY_FLAGS_ALIVE: u16 = 1 << 6;
/// Event report, levels unchanged
const NTFY_FLAGS_EVENT: u16 = 1 << 7;

/// Decode I2C traffic from a pigpio notification pipe
#[derive(Parser, Debug)]
#[command(name = "pigpio_i2c", version, about)]
struct Args {
    /// GPIO carrying SCL
    #[arg(value_parser = clap::value_parser!(u8).range(0..32))]
    scl: u8,

    /// GPIO carrying SDA
    #[arg(value_parser = clap::value_parser!(u8).range(0..32))]
    sda: u8,

    /// Notification pipe, e.g. /dev/pigpio0. Reads stdin when absent.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print every event instead of one line per message
    #[arg(short, long)]
    events: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GpioReport {
    seqno: u16,
    flags: u16,
    tick: u32,
    level: u32,
}

impl GpioReport {
    fn from_buffer(buf: &GpioBuffer) -> GpioReport {
        GpioReport {
            seqno: u16::from_le_bytes([buf[0], buf[1]]),
            flags: u16::from_le_bytes([buf[2], buf[3]]),
            tick: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            level: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
        }
    }

    /// Reports that don't describe a level change
    fn is_notice(&self) -> bool {
        self.flags & (NTFY_FLAGS_WDOG | NTFY_FLAGS_ALIVE | NTFY_FLAGS_EVENT) != 0
    }
}

/// Stream of reports read from a pigpio pipe, ending at end of file
struct GpioReportStream<R: Read> {
    input: R,
}

impl<R: Read + Unpin> Stream for GpioReportStream<R> {
    type Item = io::Result<GpioReport>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut buf: GpioBuffer = [0u8; REPORT_SIZE];

        // Blocking read, the pipe is the only thing this executor polls
        match self.input.read_exact(&mut buf) {
            Ok(()) => Poll::Ready(Some(Ok(GpioReport::from_buffer(&buf)))),
            Err(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("notification pipe closed");
                Poll::Ready(None)
            }
            Err(e) => Poll::Ready(Some(Err(e))),
        }
    }
}

/// Turns pigpio's wrapping 32-bit microsecond tick into sample indices
#[derive(Debug, Default)]
struct TickClock {
    last_tick: Option<u32>,
    elapsed: u64,
    index: Option<u64>,
}

impl TickClock {
    fn index(&mut self, tick: u32) -> u64 {
        if let Some(last) = self.last_tick {
            self.elapsed += u64::from(tick.wrapping_sub(last));
        }
        self.last_tick = Some(tick);

        // Reports within the same microsecond still get distinct indices
        let index = match self.index {
            Some(previous) => self.elapsed.max(previous + 1),
            None => self.elapsed,
        };
        self.index = Some(index);
        index
    }
}

/// Decode every report from `input`, writing to `out` until the pipe closes
fn run<R, W>(input: R, out: W, scl_gpio: u8, sda_gpio: u8, events: bool) -> io::Result<u64>
where
    R: Read + Unpin,
    W: Write,
{
    let scl_mask: u32 = 1 << scl_gpio;
    let sda_mask: u32 = 1 << sda_gpio;
    debug!("watching SCL mask 0x{:08X}, SDA mask 0x{:08X}", scl_mask, sda_mask);

    let sink: Box<dyn EventSink<Error = io::Error> + '_> = if events {
        Box::new(AnnotationWriter::new(out, AnnotationClass::Shifted))
    } else {
        Box::new(MessageWriter::new(out))
    };
    let mut decoder = Decoder::new(sink);
    let mut clock = TickClock::default();
    let mut count: u64 = 0;

    let samples = GpioReportStream { input }
        .try_filter(|report| {
            if report.is_notice() {
                trace!(seqno = report.seqno, flags = report.flags, "skipping notice");
            }
            future::ready(!report.is_notice())
        })
        .map_ok(|report| {
            Sample::new(
                clock.index(report.tick),
                report.level & scl_mask != 0,
                report.level & sda_mask != 0,
            )
        });

    block_on(samples.try_for_each(|sample| {
        count += 1;
        future::ready(decoder.feed(sample))
    }))?;

    decoder.finish()?;
    Ok(count)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let input: Box<dyn Read> = match args.input {
        Some(ref path) => Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };

    info!(scl = args.scl, sda = args.sda, "decoding pigpio notifications");
    let stdout = io::stdout();
    let count = run(BufReader::new(input), stdout.lock(), args.scl, args.sda, args.events)
        .context("decoding failed")?;
    info!(samples = count, "done");
    Ok(())
}
