//! Static description of the decoder for host applications

use crate::annotation::AnnotationClass;
use crate::config::DEFAULT_ADDRESS_SPACE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionInfo {
    pub id: &'static str,
    pub desc: &'static str,
    pub default: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationInfo {
    pub class: AnnotationClass,
    pub name: &'static str,
    pub desc: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub longname: &'static str,
    pub desc: &'static str,
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
    pub channels: &'static [ChannelInfo],
    pub options: &'static [OptionInfo],
    pub annotations: &'static [AnnotationInfo],
}

impl DecoderInfo {
    pub fn channel(&self, id: &str) -> Option<&ChannelInfo> {
        self.channels.iter().find(|c| c.id == id)
    }
}

pub const DECODER: DecoderInfo = DecoderInfo {
    id: "i2c",
    name: "I2C",
    longname: "Inter-Integrated Circuit (I2C) bus",
    desc: "I2C is a two-wire, multi-master, serial bus.",
    inputs: &["logic"],
    outputs: &["i2c"],
    channels: &[
        ChannelInfo {
            id: "scl",
            name: "SCL",
            desc: "Serial clock line",
        },
        ChannelInfo {
            id: "sda",
            name: "SDA",
            desc: "Serial data line",
        },
    ],
    options: &[OptionInfo {
        id: "address-space",
        desc: "Address space (in bits)",
        default: DEFAULT_ADDRESS_SPACE,
    }],
    annotations: &[
        AnnotationInfo {
            class: AnnotationClass::Shifted,
            name: "7-bit shifted hex",
            desc: "Read/Write bit shifted out from the 8-bit I2C slave address",
        },
        AnnotationInfo {
            class: AnnotationClass::ShiftedShort,
            name: "7-bit shifted hex (short)",
            desc: "Read/Write bit shifted out from the 8-bit I2C slave address",
        },
        AnnotationInfo {
            class: AnnotationClass::Raw,
            name: "Raw hex",
            desc: "Unaltered raw data",
        },
    ],
};
