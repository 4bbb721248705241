use std::fmt;

use crate::codec::datetime::Timestamp;
use crate::codec::enums::EnumValue;
use crate::codec::flags::FlagSet;
use crate::codec::quests::QuestLog;
use crate::record::Record;

/// A decoded field. Which variant appears is fixed by the field's codec.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Enum(EnumValue),
    Flags(FlagSet),
    Quests(QuestLog),
    DateTime(Timestamp),
    Record(Record),
    List(Vec<Value>),
    Raw(Box<RawCopy<Value>>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::Flags(_) => "flags",
            Self::Quests(_) => "quests",
            Self::DateTime(_) => "datetime",
            Self::Record(_) => "record",
            Self::List(_) => "list",
            Self::Raw(inner) => inner.value().kind(),
        }
    }

    /// The decoded value, looking through raw-copy wrappers.
    pub fn clean(&self) -> &Value {
        match self {
            Self::Raw(inner) => inner.value().clean(),
            other => other,
        }
    }

    /// Scalars render on one line; everything else renders as a nested document.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self.clean(),
            Self::Int(_)
                | Self::UInt(_)
                | Self::F32(_)
                | Self::F64(_)
                | Self::Str(_)
                | Self::Enum(_)
                | Self::DateTime(_)
        )
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.clean() {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            Self::Enum(e) => e.code().as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.clean() {
            Self::UInt(v) => Some(*v),
            Self::Int(v) => u64::try_from(*v).ok(),
            Self::Enum(e) => e.code().as_i64().and_then(|v| u64::try_from(v).ok()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.clean() {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.clean() {
            Self::Str(s) => Some(s),
            Self::Enum(e) => e.name(),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self.clean() {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_flags(&self) -> Option<&FlagSet> {
        match self.clean() {
            Self::Flags(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_quests(&self) -> Option<&QuestLog> {
        match self.clean() {
            Self::Quests(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self.clean() {
            Self::DateTime(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self.clean() {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self.clean() {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable access to the decoded value. Reaching through a raw-copy
    /// wrapper marks it modified so the encoder stops replaying its bytes.
    pub fn clean_mut(&mut self) -> &mut Value {
        match self {
            Self::Raw(inner) => inner.value_mut().clean_mut(),
            other => other,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self.clean_mut() {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::List(items) => Some(items),
            Self::Raw(inner) if matches!(inner.value().clean(), Value::List(_)) => {
                inner.value_mut().as_list_mut()
            }
            _ => None,
        }
    }

    pub fn as_flags_mut(&mut self) -> Option<&mut FlagSet> {
        match self.clean_mut() {
            Self::Flags(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_quests_mut(&mut self) -> Option<&mut QuestLog> {
        match self.clean_mut() {
            Self::Quests(q) => Some(q),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "{}", hex_groups(b)),
            Self::Enum(e) => write!(f, "{e}"),
            Self::DateTime(t) => write!(f, "{t}"),
            Self::Raw(inner) => inner.value().fmt(f),
            Self::Flags(_) | Self::Quests(_) | Self::Record(_) | Self::List(_) => {
                write!(f, "<{}>", self.kind())
            }
        }
    }
}

/// Lowercase hex in groups of four bytes, e.g. `00010203 0405`.
pub fn hex_groups(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + bytes.len() / 4);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Original bytes kept next to their decoded value. While unmodified, the
/// encoder replays `raw` verbatim so float and padding bytes never drift.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCopy<T> {
    raw: Vec<u8>,
    value: T,
    modified: bool,
}

impl<T> RawCopy<T> {
    pub fn new(raw: Vec<u8>, value: T) -> Self {
        Self {
            raw,
            value,
            modified: false,
        }
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        self.modified = true;
        &mut self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.modified = true;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Bytes to emit: the original slice if untouched, otherwise `encode(value)`.
    pub fn emit<E>(&self, encode: impl FnOnce(&T) -> Result<Vec<u8>, E>) -> Result<Vec<u8>, E> {
        if self.modified {
            encode(&self.value)
        } else {
            Ok(self.raw.clone())
        }
    }
}
