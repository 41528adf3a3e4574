//! # i2c_sniff
//!
//! Decodes I2C traffic from CSV exports of a logic analyzer.

mod capture;
mod cli;
mod config;
mod output;

use std::fs;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use i2c_parser::{Decoder, DECODER};
use tracing::info;

use capture::CaptureReader;
use cli::{Cli, Commands, DecodeArgs};
use config::SniffConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Decode(ref args) => run_decode(args, io::stdout().lock()),
        Commands::Info => run_info(io::stdout().lock()),
    }
}

/// Logs go to stderr, decoded traffic to stdout
fn init_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else {
        let default_level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).compact())
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    Ok(())
}

/// Config file first, then command-line overrides
fn load_config(args: &DecodeArgs) -> Result<SniffConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SniffConfig::from_toml(&content)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SniffConfig::default(),
    };

    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(ref scl) = args.scl {
        config.channels.scl = scl.clone();
    }
    if let Some(ref sda) = args.sda {
        config.channels.sda = sda.clone();
    }
    if let Some(ref index) = args.index {
        config.channels.index = Some(index.clone());
    }
    if let Some(bits) = args.address_space {
        config.decoder.address_space = bits;
    }

    Ok(config)
}

fn run_decode<W: Write>(args: &DecodeArgs, out: W) -> Result<()> {
    let config = load_config(args)?;
    let samples = CaptureReader::open(&args.capture, &config.channels)
        .with_context(|| format!("failed to open capture {}", args.capture.display()))?;

    let sink = output::make_sink(config.output.format, BufWriter::new(out));
    let mut decoder = Decoder::with_options(&config.decoder, sink)?;

    let mut count: u64 = 0;
    for sample in samples {
        let sample = sample.with_context(|| format!("failed to read {}", args.capture.display()))?;
        decoder.feed(sample).context("failed to write output")?;
        count += 1;
    }

    decoder.finish().context("failed to write output")?;
    info!(samples = count, capture = %args.capture.display(), "capture decoded");
    Ok(())
}

fn run_info<W: Write>(mut out: W) -> Result<()> {
    writeln!(out, "{} ({}): {}", DECODER.name, DECODER.id, DECODER.longname)?;
    writeln!(out, "{}", DECODER.desc)?;
    writeln!(out, "Inputs: {}", DECODER.inputs.join(", "))?;
    writeln!(out, "Outputs: {}", DECODER.outputs.join(", "))?;
    writeln!(out, "Channels:")?;
    for channel in DECODER.channels {
        writeln!(out, "  {:<4} {:<4} {}", channel.id, channel.name, channel.desc)?;
    }
    writeln!(out, "Options:")?;
    for option in DECODER.options {
        writeln!(out, "  {} = {}  ({})", option.id, option.default, option.desc)?;
    }
    writeln!(out, "Annotations:")?;
    for annotation in DECODER.annotations {
        writeln!(out, "  {}: {}", annotation.name, annotation.desc)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::OutputFormat;
    use i2c_parser::{Direction, I2cStatus, Waveform};
    use std::path::{Path, PathBuf};

    /// Writes a waveform as a capture, SDA column before SCL
    fn write_capture(dir: &Path, wave: &Waveform) -> PathBuf {
        let path = dir.join("capture.csv");
        let mut writer = csv::Writer::from_path(&path).unwrap();
        writer.write_record(["sample", "SDA", "SCL"]).unwrap();
        for s in wave.samples() {
            writer
                .write_record([
                    (s.index * 10).to_string(),
                    u8::from(s.sda).to_string(),
                    u8::from(s.scl).to_string(),
                ])
                .unwrap();
        }
        writer.flush().unwrap();
        path
    }

    fn decode_args(capture: PathBuf) -> DecodeArgs {
        DecodeArgs {
            capture,
            config: None,
            format: None,
            scl: None,
            sda: None,
            index: None,
            address_space: None,
        }
    }

    fn eeprom_read() -> Waveform {
        let mut wave = Waveform::new();
        wave.start()
            .address(0x50, Direction::Write, I2cStatus::Ack)
            .byte(0x00, I2cStatus::Ack)
            .start()
            .address(0x50, Direction::Read, I2cStatus::Ack)
            .byte(0xDE, I2cStatus::Ack)
            .byte(0xAD, I2cStatus::Nack)
            .stop();
        wave
    }

    #[test]
    fn test_decode_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let capture = write_capture(dir.path(), &eeprom_read());
        let config = dir.path().join("sniff.toml");
        fs::write(
            &config,
            "[channels]\nscl = \"SCL\"\nsda = \"SDA\"\nindex = \"sample\"\n\n[output]\nformat = \"messages\"\n",
        )
        .unwrap();

        let mut args = decode_args(capture);
        args.config = Some(config);
        let mut out = Vec::new();
        run_decode(&args, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[A0+00+][A1+DE+AD-]\n");
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let capture = write_capture(dir.path(), &eeprom_read());

        let mut args = decode_args(capture);
        args.scl = Some("scl".to_string());
        args.sda = Some("sda".to_string());
        args.index = Some("sample".to_string());
        args.format = Some(OutputFormat::Short);
        let mut out = Vec::new();
        run_decode(&args, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].ends_with(" S"));
        assert!(lines[3].ends_with(" Sr"));
        assert!(lines[6].ends_with(" DR 0xad N"));
        // Spans are reported in the capture's own sample numbers
        assert!(lines[0].starts_with("10-10 "));
    }

    #[test]
    fn test_ten_bit_addressing_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let capture = write_capture(dir.path(), &eeprom_read());

        let mut args = decode_args(capture);
        args.scl = Some("SCL".to_string());
        args.sda = Some("SDA".to_string());
        args.address_space = Some(10);
        assert!(run_decode(&args, Vec::new()).is_err());
    }

    #[test]
    fn test_missing_capture() {
        let dir = tempfile::tempdir().unwrap();
        let args = decode_args(dir.path().join("nope.csv"));
        let err = run_decode(&args, Vec::new()).unwrap_err();
        let report = format!("{:#}", err);
        assert!(report.starts_with("failed to open capture "));
        assert!(report.contains("nope.csv"));
    }

    #[test]
    fn test_info_lists_channels() {
        let mut out = Vec::new();
        run_info(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("I2C (i2c)"));
        assert!(out.contains("scl  SCL  Serial clock line"));
        assert!(out.contains("address-space = 7"));
    }
}
