//! Locate a known number in a record's raw bytes, for mapping out fields
//! nobody has decoded yet.

use std::fmt;

use tracing::debug;

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Needle {
    Int(i128),
    Float(f64),
}

impl fmt::Display for Needle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// One way the needle can be laid out in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub type_name: &'static str,
    pub endian: Endian,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberHit {
    pub field: String,
    pub type_name: &'static str,
    pub endian: Endian,
    /// Offset of the first match within the record.
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl fmt::Display for NumberHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ 0x{:X} as {} ({:?} endian): {}",
            self.field,
            self.offset,
            self.type_name,
            self.endian,
            crate::value::hex_groups(&self.bytes)
        )
    }
}

macro_rules! push_int {
    ($out:ident, $value:expr, $endian:expr, $($ty:ty => $name:literal),+ $(,)?) => {
        $(
            if let Ok(v) = <$ty>::try_from($value) {
                let bytes = match $endian {
                    Endian::Little => v.to_le_bytes().to_vec(),
                    Endian::Big => v.to_be_bytes().to_vec(),
                };
                $out.push(Encoding { type_name: $name, endian: $endian, bytes });
            }
        )+
    };
}

/// Every fixed-width encoding of `needle`: signed and unsigned integers of
/// 1 to 8 bytes, then 32 and 64-bit floats, little endian first. Integers
/// that do not fit a width and floats that overflow `f32` are skipped.
pub fn encodings(needle: Needle) -> Vec<Encoding> {
    let mut out = Vec::new();
    for endian in [Endian::Little, Endian::Big] {
        let float = match needle {
            Needle::Int(v) => {
                push_int!(out, v, endian,
                    i8 => "int8", i16 => "int16", i32 => "int32", i64 => "int64",
                    u8 => "uint8", u16 => "uint16", u32 => "uint32", u64 => "uint64",
                );
                v as f64
            }
            Needle::Float(v) => v,
        };

        let single = float as f32;
        if single.is_finite() || !float.is_finite() {
            let bytes = match endian {
                Endian::Little => single.to_le_bytes().to_vec(),
                Endian::Big => single.to_be_bytes().to_vec(),
            };
            out.push(Encoding {
                type_name: "float32",
                endian,
                bytes,
            });
        }
        let bytes = match endian {
            Endian::Little => float.to_le_bytes().to_vec(),
            Endian::Big => float.to_be_bytes().to_vec(),
        };
        out.push(Encoding {
            type_name: "float64",
            endian,
            bytes,
        });
    }
    out
}

/// Fields whose raw bytes contain some encoding of `needle`. With
/// `hidden_only`, only undecoded filler fields are searched.
pub fn find_number(record: &Record, needle: Needle, hidden_only: bool) -> Vec<NumberHit> {
    let mut hits = Vec::new();
    for encoding in encodings(needle) {
        debug!(%needle, type_name = encoding.type_name, endian = ?encoding.endian, "searching");
        for field in record.layout().fields() {
            if hidden_only && !field.is_hidden() {
                continue;
            }
            let raw = &record.as_bytes()[field.range()];
            let Some(pos) = raw
                .windows(encoding.bytes.len())
                .position(|w| w == encoding.bytes.as_slice())
            else {
                continue;
            };
            hits.push(NumberHit {
                field: field.name().to_string(),
                type_name: encoding.type_name,
                endian: encoding.endian,
                offset: field.offset() + pos,
                bytes: encoding.bytes.clone(),
            });
        }
    }
    hits
}
