use crate::error::{CodecError, Result};
use crate::reader::LittleEndianReader;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl Primitive {
    pub const fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }

    pub fn read(self, r: &mut LittleEndianReader<'_>) -> Result<Value> {
        Ok(match self {
            Self::U8 => Value::UInt(u64::from(r.read_u8()?)),
            Self::U16 => Value::UInt(u64::from(r.read_u16()?)),
            Self::U32 => Value::UInt(u64::from(r.read_u32()?)),
            Self::U64 => Value::UInt(r.read_u64()?),
            Self::I8 => Value::Int(i64::from(r.read_i8()?)),
            Self::I16 => Value::Int(i64::from(r.read_i16()?)),
            Self::I32 => Value::Int(i64::from(r.read_i32()?)),
            Self::I64 => Value::Int(r.read_i64()?),
            Self::F32 => Value::F32(r.read_f32()?),
            Self::F64 => Value::F64(r.read_f64()?),
        })
    }

    /// Write `value` into `out`, which must be exactly [`Primitive::size`] bytes.
    pub fn write(self, value: &Value, out: &mut [u8]) -> Result<()> {
        debug_assert_eq!(out.len(), self.size());
        match self {
            Self::U8 => out.copy_from_slice(&self.unsigned::<u8>(value)?.to_le_bytes()),
            Self::U16 => out.copy_from_slice(&self.unsigned::<u16>(value)?.to_le_bytes()),
            Self::U32 => out.copy_from_slice(&self.unsigned::<u32>(value)?.to_le_bytes()),
            Self::U64 => out.copy_from_slice(&self.unsigned::<u64>(value)?.to_le_bytes()),
            Self::I8 => out.copy_from_slice(&self.signed::<i8>(value)?.to_le_bytes()),
            Self::I16 => out.copy_from_slice(&self.signed::<i16>(value)?.to_le_bytes()),
            Self::I32 => out.copy_from_slice(&self.signed::<i32>(value)?.to_le_bytes()),
            Self::I64 => out.copy_from_slice(&self.signed::<i64>(value)?.to_le_bytes()),
            Self::F32 => {
                let v = match value.clean() {
                    Value::F32(v) => *v,
                    other => self.float(other)? as f32,
                };
                out.copy_from_slice(&v.to_le_bytes());
            }
            Self::F64 => out.copy_from_slice(&self.float(value)?.to_le_bytes()),
        }
        Ok(())
    }

    fn unsigned<T: TryFrom<u64>>(self, value: &Value) -> Result<T> {
        let raw = value.as_u64().ok_or_else(|| self.mismatch(value))?;
        T::try_from(raw).map_err(|_| {
            CodecError::invalid_mutation("", format!("{raw} does not fit in {}", self.name()))
        })
    }

    fn signed<T: TryFrom<i64>>(self, value: &Value) -> Result<T> {
        let raw = value.as_i64().ok_or_else(|| self.mismatch(value))?;
        T::try_from(raw).map_err(|_| {
            CodecError::invalid_mutation("", format!("{raw} does not fit in {}", self.name()))
        })
    }

    fn float(self, value: &Value) -> Result<f64> {
        value.as_f64().ok_or_else(|| self.mismatch(value))
    }

    fn mismatch(self, value: &Value) -> CodecError {
        CodecError::invalid_mutation(
            "",
            format!("expected a {} value, got {}", self.name(), value.kind()),
        )
    }
}

pub fn write_padded_string(s: &str, out: &mut [u8]) -> Result<()> {
    let bytes = s.as_bytes();
    if bytes.len() > out.len() {
        return Err(CodecError::invalid_mutation(
            "",
            format!(
                "{:?} is {} bytes long, at most {} fit",
                s,
                bytes.len(),
                out.len()
            ),
        ));
    }
    out[..bytes.len()].copy_from_slice(bytes);
    out[bytes.len()..].fill(0);
    Ok(())
}
