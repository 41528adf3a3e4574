//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::OutputFormat;

/// Decode I2C traffic from logic analyzer CSV captures
#[derive(Parser, Debug)]
#[command(name = "i2c_sniff", author, version, about)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all logging except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a CSV capture of SCL and SDA
    Decode(DecodeArgs),

    /// Describe the decoder: channels, options and annotations
    Info,
}

/// Arguments for the `decode` command. Flags override the config file.
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    /// CSV capture with a header row
    pub capture: PathBuf,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Header of the SCL column
    #[arg(long)]
    pub scl: Option<String>,

    /// Header of the SDA column
    #[arg(long)]
    pub sda: Option<String>,

    /// Header of the sample index column
    #[arg(long)]
    pub index: Option<String>,

    /// Slave address width in bits
    #[arg(long)]
    pub address_space: Option<u8>,
}
