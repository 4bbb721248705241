use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{CodecError, Result};
use crate::reader::LittleEndianReader;

pub const TIMESTAMP_SIZE: usize = 7;

/// The seven stored bytes: a u16 year then month, day, hour, minute, second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestampParts {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Decoded save/plant time. All-zero bytes mean "never set"; anything that is
/// not a real calendar time is kept as raw parts so it re-encodes unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Unset,
    At(NaiveDateTime),
    Invalid(TimestampParts),
}

impl Timestamp {
    pub fn from_parts(p: TimestampParts) -> Self {
        if p == TimestampParts::default() {
            return Self::Unset;
        }
        if p.year == 0 {
            return Self::Invalid(p);
        }
        NaiveDate::from_ymd_opt(i32::from(p.year), u32::from(p.month), u32::from(p.day))
            .and_then(|d| {
                d.and_hms_opt(u32::from(p.hour), u32::from(p.minute), u32::from(p.second))
            })
            .map_or(Self::Invalid(p), Self::At)
    }

    pub fn parts(&self) -> Result<TimestampParts> {
        match self {
            Self::Unset => Ok(TimestampParts::default()),
            Self::Invalid(p) => Ok(*p),
            Self::At(dt) => {
                let year = u16::try_from(dt.year()).map_err(|_| {
                    CodecError::invalid_mutation("", format!("year {} is out of range", dt.year()))
                })?;
                Ok(TimestampParts {
                    year,
                    month: dt.month() as u8,
                    day: dt.day() as u8,
                    hour: dt.hour() as u8,
                    minute: dt.minute() as u8,
                    second: dt.second() as u8,
                })
            }
        }
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::At(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    pub fn decode(r: &mut LittleEndianReader<'_>) -> Result<Self> {
        Ok(Self::from_parts(TimestampParts {
            year: r.read_u16()?,
            month: r.read_u8()?,
            day: r.read_u8()?,
            hour: r.read_u8()?,
            minute: r.read_u8()?,
            second: r.read_u8()?,
        }))
    }

    pub fn encode(&self, out: &mut [u8]) -> Result<()> {
        let p = self.parts()?;
        out[..2].copy_from_slice(&p.year.to_le_bytes());
        out[2..TIMESTAMP_SIZE].copy_from_slice(&[p.month, p.day, p.hour, p.minute, p.second]);
        Ok(())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self::At(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("None"),
            Self::At(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Self::Invalid(p) => write!(
                f,
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02} (invalid)",
                p.year, p.month, p.day, p.hour, p.minute, p.second
            ),
        }
    }
}
