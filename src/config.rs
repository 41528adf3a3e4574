//! Config file for decoding captures
//!
//! ```toml
//! [decoder]
//! address-space = 7
//!
//! [channels]
//! scl = "D0"
//! sda = "D1"
//! index = "sample"
//!
//! [output]
//! format = "short"
//! ```

use clap::ValueEnum;
use i2c_parser::{AnnotationClass, ConfigError, DecoderOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SniffConfig {
    pub decoder: DecoderOptions,
    pub channels: ChannelMap,
    pub output: OutputConfig,
}

/// CSV header names of the columns to read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelMap {
    pub scl: String,
    pub sda: String,
    /// Sample number column; row numbers are used when absent
    pub index: Option<String>,
}

impl Default for ChannelMap {
    fn default() -> ChannelMap {
        ChannelMap {
            scl: "scl".to_string(),
            sda: "sda".to_string(),
            index: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Long labels, e.g. `ADDRESS WRITE 0x50 ACK`
    #[default]
    Long,
    /// Short labels, e.g. `AW 0x50 A`
    Short,
    /// Address and data bytes as transmitted
    Raw,
    /// One JSON object per event
    Json,
    /// One line per START..STOP message
    Messages,
}

impl OutputFormat {
    pub fn annotation_class(self) -> Option<AnnotationClass> {
        match self {
            OutputFormat::Long => Some(AnnotationClass::Shifted),
            OutputFormat::Short => Some(AnnotationClass::ShiftedShort),
            OutputFormat::Raw => Some(AnnotationClass::Raw),
            OutputFormat::Json | OutputFormat::Messages => None,
        }
    }
}

impl SniffConfig {
    pub fn from_toml(content: &str) -> Result<SniffConfig, ConfigError> {
        let config: SniffConfig = toml::from_str(content)?;
        config.decoder.validate()?;
        Ok(config)
    }
}
