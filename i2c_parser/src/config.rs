//! Decoder options

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default, and only supported, slave address width
pub const DEFAULT_ADDRESS_SPACE: u8 = 7;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}-bit slave addressing is not supported")]
    UnsupportedAddressSpace(u8),

    #[error("invalid address space of {0} bits, expected 7 or 10")]
    InvalidAddressSpace(u8),
}

/// Options accepted when setting up a decoder
///
/// ```toml
/// address-space = 7
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct DecoderOptions {
    /// Slave address width in bits
    pub address_space: u8,
}

impl Default for DecoderOptions {
    fn default() -> DecoderOptions {
        DecoderOptions {
            address_space: DEFAULT_ADDRESS_SPACE,
        }
    }
}

impl DecoderOptions {
    pub fn from_toml(content: &str) -> Result<DecoderOptions, ConfigError> {
        let options: DecoderOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.address_space {
            7 => Ok(()),
            10 => Err(ConfigError::UnsupportedAddressSpace(10)),
            bits => Err(ConfigError::InvalidAddressSpace(bits)),
        }
    }
}
