use std::fmt;

use crate::codec::primitive::Primitive;
use crate::error::{CodecError, Result};
use crate::reader::LittleEndianReader;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumCode {
    Int(i64),
    Float(f32),
}

impl EnumCode {
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(_) => None,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.clean() {
            Value::Int(v) => Some(Self::Int(*v)),
            Value::UInt(v) => i64::try_from(*v).ok().map(Self::Int),
            Value::F32(v) => Some(Self::Float(*v)),
            Value::F64(v) => Some(Self::Float(*v as f32)),
            _ => None,
        }
    }
}

impl fmt::Display for EnumCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A decoded enum member. `name` is `None` for the table's absent sentinel.
///
/// Compares equal to both its symbolic name and its raw code, so callers can
/// write `plot.seed == "Tomato Seed"` or `weapon == 20i64` interchangeably.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumValue {
    code: EnumCode,
    name: Option<&'static str>,
}

impl EnumValue {
    pub fn code(&self) -> EnumCode {
        self.code
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    pub fn is_absent(&self) -> bool {
        self.name.is_none()
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.unwrap_or("None"))
    }
}

impl PartialEq<&str> for EnumValue {
    fn eq(&self, other: &&str) -> bool {
        self.name == Some(*other)
    }
}

impl PartialEq<str> for EnumValue {
    fn eq(&self, other: &str) -> bool {
        self.name == Some(other)
    }
}

impl PartialEq<i64> for EnumValue {
    fn eq(&self, other: &i64) -> bool {
        self.code == EnumCode::Int(*other)
    }
}

impl PartialEq<f32> for EnumValue {
    fn eq(&self, other: &f32) -> bool {
        match self.code {
            EnumCode::Float(v) => v == *other,
            EnumCode::Int(v) => v as f32 == *other,
        }
    }
}

/// Name <-> code table over one primitive, with an optional "absent" sentinel
/// that decodes to [`EnumValue::is_absent`] instead of failing.
#[derive(Debug)]
pub struct EnumTable {
    domain: &'static str,
    primitive: Primitive,
    entries: Vec<(EnumCode, &'static str)>,
    sentinel: Option<EnumCode>,
}

impl EnumTable {
    /// Codes are list positions. Empty names leave their code unassigned.
    pub fn indexed(domain: &'static str, primitive: Primitive, names: &[&'static str]) -> Self {
        Self::explicit(
            domain,
            primitive,
            names
                .iter()
                .enumerate()
                .filter(|(_, n)| !n.is_empty())
                .map(|(i, &n)| (i as i64, n)),
        )
    }

    /// Several lists laid out at fixed bases, e.g. one-handed swords from 0,
    /// two-handed from 20, spears from 40.
    pub fn segmented(
        domain: &'static str,
        primitive: Primitive,
        segments: &[(i64, &[&'static str])],
    ) -> Self {
        Self::explicit(
            domain,
            primitive,
            segments.iter().flat_map(|&(base, names)| {
                names.iter().enumerate().map(move |(i, &n)| (base + i as i64, n))
            }),
        )
    }

    pub fn explicit(
        domain: &'static str,
        primitive: Primitive,
        entries: impl IntoIterator<Item = (i64, &'static str)>,
    ) -> Self {
        Self {
            domain,
            primitive,
            entries: entries
                .into_iter()
                .map(|(code, name)| (EnumCode::Int(code), name))
                .collect(),
            sentinel: None,
        }
    }

    pub fn float(domain: &'static str, entries: &[(f32, &'static str)]) -> Self {
        Self {
            domain,
            primitive: Primitive::F32,
            entries: entries
                .iter()
                .map(|&(code, name)| (EnumCode::Float(code), name))
                .collect(),
            sentinel: None,
        }
    }

    pub fn with_sentinel(mut self, code: i64) -> Self {
        self.sentinel = Some(EnumCode::Int(code));
        self
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    pub fn size(&self) -> usize {
        self.primitive.size()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(_, name)| name)
    }

    pub fn by_name(&self, name: &str) -> Option<EnumValue> {
        self.entries
            .iter()
            .find(|(_, n)| *n == name)
            .map(|&(code, name)| EnumValue {
                code,
                name: Some(name),
            })
    }

    pub fn by_code(&self, code: EnumCode) -> Option<EnumValue> {
        if let Some(&(code, name)) = self.entries.iter().find(|(c, _)| *c == code) {
            return Some(EnumValue {
                code,
                name: Some(name),
            });
        }
        (self.sentinel == Some(code)).then_some(EnumValue { code, name: None })
    }

    pub fn absent(&self) -> Option<EnumValue> {
        self.sentinel.map(|code| EnumValue { code, name: None })
    }

    pub fn decode(&self, r: &mut LittleEndianReader<'_>) -> Result<EnumValue> {
        let start = r.position();
        let raw = self.primitive.read(r)?;
        let code = EnumCode::from_value(&raw).unwrap_or(EnumCode::Int(-1));
        self.by_code(code).ok_or_else(|| CodecError::UnknownEnumCode {
            field: String::new(),
            offset: start,
            domain: self.domain,
            code: raw.to_string(),
        })
    }

    /// Accepts a decoded member, a bare name, or a raw code. Anything outside
    /// the table (sentinel included, when registered) is an invalid mutation.
    pub fn resolve(&self, value: &Value) -> Result<EnumValue> {
        let resolved = match value.clean() {
            Value::Enum(e) => self.by_code(e.code).filter(|found| found.name == e.name),
            Value::Str(name) => self.by_name(name),
            other => EnumCode::from_value(other).and_then(|code| self.by_code(code)),
        };
        resolved.ok_or_else(|| {
            CodecError::invalid_mutation("", format!("{value} is not a valid {}", self.domain))
        })
    }

    pub fn encode(&self, value: &Value, out: &mut [u8]) -> Result<()> {
        let member = self.resolve(value)?;
        let raw = match member.code {
            EnumCode::Int(v) => Value::Int(v),
            EnumCode::Float(v) => Value::F32(v),
        };
        self.primitive.write(&raw, out)
    }
}
