//! The closed set of field codecs a layout is built from.
//!
//! Every codec decodes from, and encodes into, the buffer of its enclosing
//! record at a given offset. That is what lets a checksum see the bytes it
//! covers. Errors come back with offsets relative to that record buffer.

pub mod checksum;
pub mod datetime;
pub mod enums;
pub mod flags;
pub mod primitive;
pub mod quests;

use crate::error::{CodecError, Result};
use crate::reader::LittleEndianReader;
use crate::record::{Layout, Record};
use crate::value::{RawCopy, Value};

use checksum::ChecksumSpec;
use datetime::{TIMESTAMP_SIZE, Timestamp};
use enums::EnumTable;
use flags::FlagArray;
use primitive::{Primitive, write_padded_string};
use quests::QuestBitfield;

#[derive(Debug)]
pub enum Codec {
    Prim(Primitive),
    /// Fixed-width NUL-padded UTF-8.
    Str(usize),
    /// Undecoded bytes, kept verbatim.
    Bytes(usize),
    Enum(&'static EnumTable),
    Flags(&'static FlagArray),
    Quests(&'static QuestBitfield),
    Checksum(ChecksumSpec),
    DateTime,
    Record(&'static Layout),
    Array(Box<Codec>, usize),
    /// Keep the original bytes next to the decoded value.
    RawCopy(Box<Codec>),
}

impl Codec {
    pub fn array(inner: Codec, count: usize) -> Self {
        Self::Array(Box::new(inner), count)
    }

    pub fn raw_copy(inner: Codec) -> Self {
        Self::RawCopy(Box::new(inner))
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Prim(p) => p.size(),
            Self::Str(n) | Self::Bytes(n) => *n,
            Self::Enum(t) => t.size(),
            Self::Flags(f) => f.size(),
            Self::Quests(q) => q.size(),
            Self::Checksum(_) => 4,
            Self::DateTime => TIMESTAMP_SIZE,
            Self::Record(layout) => layout.size(),
            Self::Array(inner, count) => inner.size() * count,
            Self::RawCopy(inner) => inner.size(),
        }
    }

    pub fn decode(&self, record: &[u8], offset: usize) -> Result<Value> {
        let size = self.size();
        if record.len() < offset + size {
            return Err(CodecError::Truncated {
                field: String::new(),
                offset,
                needed: size,
                available: record.len().saturating_sub(offset),
            });
        }
        let mut r = LittleEndianReader::at(record, offset);
        let bytes = &record[offset..offset + size];

        Ok(match self {
            Self::Prim(p) => p.read(&mut r)?,
            Self::Str(n) => Value::Str(r.read_padded_string(*n)?),
            Self::Bytes(_) => Value::Bytes(bytes.to_vec()),
            Self::Enum(table) => Value::Enum(table.decode(&mut r)?),
            Self::Flags(array) => Value::Flags(array.decode(bytes)),
            Self::Quests(field) => Value::Quests(field.decode(bytes)),
            Self::Checksum(spec) => {
                let stored = r.read_u32()?;
                let computed = spec.compute(record, offset);
                if stored != computed {
                    return Err(CodecError::ChecksumMismatch {
                        field: String::new(),
                        offset,
                        stored,
                        computed,
                    });
                }
                Value::UInt(u64::from(stored))
            }
            Self::DateTime => Value::DateTime(Timestamp::decode(&mut r)?),
            Self::Record(layout) => {
                Value::Record(Record::decode(*layout, bytes).map_err(|e| e.at("", offset))?)
            }
            Self::Array(inner, count) => {
                let step = inner.size();
                let mut items = Vec::with_capacity(*count);
                for i in 0..*count {
                    let item = inner
                        .decode(record, offset + i * step)
                        .map_err(|e| e.at(&i.to_string(), 0))?;
                    items.push(item);
                }
                Value::List(items)
            }
            Self::RawCopy(inner) => Value::Raw(Box::new(RawCopy::new(
                bytes.to_vec(),
                inner.decode(record, offset)?,
            ))),
        })
    }

    /// Encode `value` into `record[offset..offset + size]`. Fields a checksum
    /// covers must already be written when the checksum field is reached.
    pub fn encode(&self, value: &Value, record: &mut [u8], offset: usize) -> Result<()> {
        let size = self.size();
        let out = &mut record[offset..offset + size];

        match self {
            Self::Prim(p) => p.write(value, out),
            Self::Str(_) => {
                let s = value.as_str().ok_or_else(|| mismatch("string", value))?;
                write_padded_string(s, out)
            }
            Self::Bytes(n) => match value.clean() {
                Value::Bytes(b) if b.len() == *n => {
                    out.copy_from_slice(b);
                    Ok(())
                }
                Value::Bytes(b) => Err(CodecError::invalid_mutation(
                    "",
                    format!("expected {n} bytes, got {}", b.len()),
                )),
                other => Err(mismatch("bytes", other)),
            },
            Self::Enum(table) => table.encode(value, out),
            Self::Flags(array) => {
                let set = value.as_flags().ok_or_else(|| mismatch("flags", value))?;
                array.encode(set, out)
            }
            Self::Quests(field) => {
                let log = value.as_quests().ok_or_else(|| mismatch("quests", value))?;
                field.encode(log, out)
            }
            Self::Checksum(spec) => {
                let computed = spec.compute(record, offset);
                record[offset..offset + 4].copy_from_slice(&computed.to_le_bytes());
                Ok(())
            }
            Self::DateTime => {
                let ts = value.as_timestamp().ok_or_else(|| mismatch("datetime", value))?;
                ts.encode(out)
            }
            Self::Record(layout) => {
                let nested = value.as_record().ok_or_else(|| mismatch("record", value))?;
                if !std::ptr::eq(nested.layout(), *layout) {
                    return Err(CodecError::invalid_mutation(
                        "",
                        format!("expected a {} record, got {}", layout.name(), nested.layout().name()),
                    ));
                }
                nested.encode_into(out)
            }
            Self::Array(inner, count) => {
                let items = value.as_list().ok_or_else(|| mismatch("list", value))?;
                if items.len() != *count {
                    return Err(CodecError::invalid_mutation(
                        "",
                        format!("expected {count} items, got {}", items.len()),
                    ));
                }
                let step = inner.size();
                for (i, item) in items.iter().enumerate() {
                    inner
                        .encode(item, record, offset + i * step)
                        .map_err(|e| e.at(&i.to_string(), 0))?;
                }
                Ok(())
            }
            Self::RawCopy(inner) => match value {
                Value::Raw(copy) if !copy.is_modified() && copy.raw().len() == size => {
                    out.copy_from_slice(copy.raw());
                    Ok(())
                }
                Value::Raw(copy) => inner.encode(copy.value(), record, offset),
                other => inner.encode(other, record, offset),
            },
        }
    }

    /// Codecs whose stored value is recomputed on every encode.
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::Checksum(_))
    }
}

fn mismatch(expected: &str, value: &Value) -> CodecError {
    CodecError::invalid_mutation("", format!("expected {expected}, got {}", value.kind()))
}
