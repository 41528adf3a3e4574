//! Reading SCL/SDA samples from CSV logic analyzer exports

use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use i2c_parser::Sample;
use thiserror::Error;
use tracing::debug;

use crate::config::ChannelMap;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{0}' not found in capture header")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' missing")]
    ShortRow { row: u64, column: String },

    #[error("row {row}: invalid level '{value}' in column '{column}'")]
    InvalidLevel { row: u64, column: String, value: String },

    #[error("row {row}: invalid sample index '{value}'")]
    InvalidIndex { row: u64, value: String },

    #[error("row {row}: sample index {index} does not follow {previous}")]
    IndexNotIncreasing { row: u64, index: u64, previous: u64 },
}

#[derive(Debug, Clone)]
struct Column {
    name: String,
    position: usize,
}

/// Iterator over the samples of a capture, in file order
pub struct CaptureReader<R> {
    records: StringRecordsIntoIter<R>,
    scl: Column,
    sda: Column,
    index: Option<Column>,
    row: u64,
    previous: Option<u64>,
}

impl CaptureReader<File> {
    pub fn open(path: &Path, channels: &ChannelMap) -> Result<CaptureReader<File>, CaptureError> {
        let file = File::open(path).map_err(csv::Error::from)?;
        CaptureReader::from_reader(file, channels)
    }
}

impl<R: io::Read> CaptureReader<R> {
    /// Lines starting with `;` are comments. The first remaining line is the header.
    ///
    /// Rows may differ in length from the header; a row missing a column that
    ///   is read fails with `ShortRow`.
    pub fn from_reader(input: R, channels: &ChannelMap) -> Result<CaptureReader<R>, CaptureError> {
        let mut reader = ReaderBuilder::new()
            .comment(Some(b';'))
            .trim(Trim::All)
            .flexible(true)
            .from_reader(input);
        let headers = reader.headers()?.clone();

        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .map(|position| Column {
                    name: name.to_string(),
                    position,
                })
                .ok_or_else(|| CaptureError::MissingColumn(name.to_string()))
        };

        let scl = find(&channels.scl)?;
        let sda = find(&channels.sda)?;
        let index = match channels.index {
            Some(ref name) => Some(find(name)?),
            None => None,
        };
        debug!(scl = scl.position, sda = sda.position, index = ?index.as_ref().map(|c| c.position), "capture columns");

        Ok(CaptureReader {
            records: reader.into_records(),
            scl,
            sda,
            index,
            row: 0,
            previous: None,
        })
    }

    fn field<'r>(&self, record: &'r StringRecord, column: &Column) -> Result<&'r str, CaptureError> {
        record.get(column.position).ok_or_else(|| CaptureError::ShortRow {
            row: self.row,
            column: column.name.clone(),
        })
    }

    fn level(&self, record: &StringRecord, column: &Column) -> Result<bool, CaptureError> {
        let value = self.field(record, column)?;
        parse_level(value).ok_or_else(|| CaptureError::InvalidLevel {
            row: self.row,
            column: column.name.clone(),
            value: value.to_string(),
        })
    }

    fn sample(&mut self, record: &StringRecord) -> Result<Sample, CaptureError> {
        let index = match self.index {
            Some(ref column) => {
                let value = self.field(record, column)?;
                value.parse::<u64>().map_err(|_| CaptureError::InvalidIndex {
                    row: self.row,
                    value: value.to_string(),
                })?
            }
            None => self.row,
        };

        if let Some(previous) = self.previous {
            if index <= previous {
                return Err(CaptureError::IndexNotIncreasing {
                    row: self.row,
                    index,
                    previous,
                });
            }
        }

        let sample = Sample::new(index, self.level(record, &self.scl)?, self.level(record, &self.sda)?);
        self.previous = Some(index);
        self.row += 1;
        Ok(sample)
    }
}

fn parse_level(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "high" => Some(true),
        "0" | "false" | "low" => Some(false),
        _ => None,
    }
}

impl<R: io::Read> Iterator for CaptureReader<R> {
    type Item = Result<Sample, CaptureError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        Some(self.sample(&record))
    }
}
