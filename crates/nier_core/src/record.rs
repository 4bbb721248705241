//! Record composition: ordered fields with computed offsets, decoded values
//! alongside the record's bytes, and atomic field mutation.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;

use tracing::{debug, warn};

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::value::Value;

#[derive(Debug)]
pub struct Field {
    name: Cow<'static, str>,
    codec: Codec,
    offset: usize,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.codec.size()
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size()
    }

    /// Undecoded filler and internal fields start with an underscore.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// A fixed record shape. Built once, then shared by every record decoded from it.
#[derive(Debug)]
pub struct Layout {
    name: &'static str,
    fields: Vec<Field>,
    index: HashMap<Cow<'static, str>, usize>,
    size: usize,
}

pub struct LayoutBuilder {
    name: &'static str,
    fields: Vec<(Cow<'static, str>, Codec)>,
}

impl LayoutBuilder {
    pub fn field(mut self, name: impl Into<Cow<'static, str>>, codec: Codec) -> Self {
        self.fields.push((name.into(), codec));
        self
    }

    pub fn bytes(self, name: impl Into<Cow<'static, str>>, len: usize) -> Self {
        self.field(name, Codec::Bytes(len))
    }

    pub fn fields<N: Into<Cow<'static, str>>>(
        mut self,
        fields: impl IntoIterator<Item = (N, Codec)>,
    ) -> Self {
        self.fields
            .extend(fields.into_iter().map(|(n, c)| (n.into(), c)));
        self
    }

    /// Panics on duplicate names or a checksum whose span is not fully before
    /// it; layouts are static tables and either mistake is a programming error.
    pub fn build(self) -> Layout {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut index = HashMap::with_capacity(self.fields.len());
        let mut offset = 0usize;
        for (name, codec) in self.fields {
            if let Codec::Checksum(spec) = &codec {
                let covered = spec.covered(offset);
                assert!(
                    covered.end <= offset && offset >= spec.lookback,
                    "{}.{name}: checksum span {covered:?} must precede offset {offset}",
                    self.name
                );
            }
            let prev = index.insert(name.clone(), fields.len());
            assert!(prev.is_none(), "{}: duplicate field {name:?}", self.name);
            let size = codec.size();
            fields.push(Field {
                name,
                codec,
                offset,
            });
            offset += size;
        }
        Layout {
            name: self.name,
            fields,
            index,
            size: offset,
        }
    }

    pub fn build_sized(self, expected: usize) -> Layout {
        let layout = self.build();
        assert_eq!(
            layout.size, expected,
            "{} layout is {} bytes, expected {expected}",
            layout.name, layout.size
        );
        layout
    }
}

impl Layout {
    pub fn builder(name: &'static str) -> LayoutBuilder {
        LayoutBuilder {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|i| &self.fields[i])
    }

    /// Byte span of a named field, straight from the cached offsets.
    pub fn range(&self, name: &str) -> Result<Range<usize>> {
        self.field(name)
            .map(Field::range)
            .ok_or_else(|| CodecError::UnknownField(name.to_string()))
    }

    fn refresh_checksums(&self, buf: &mut [u8]) -> Result<()> {
        for field in self.fields.iter().filter(|f| f.codec.is_derived()) {
            field
                .codec
                .encode(&Value::UInt(0), buf, field.offset)
                .map_err(|e| e.at(&field.name, 0))?;
        }
        Ok(())
    }
}

/// A decoded record: its bytes plus one decoded value per field.
///
/// `raw` always holds a valid encoding of `values`; mutations re-encode the
/// touched field and refresh checksums before anything is committed.
#[derive(Debug, Clone)]
pub struct Record {
    layout: &'static Layout,
    raw: Vec<u8>,
    values: Vec<Value>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.layout, other.layout) && self.values == other.values
    }
}

impl Record {
    pub fn decode(layout: &'static Layout, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != layout.size {
            return Err(CodecError::LayoutMismatch {
                field: String::new(),
                offset: 0,
                expected: layout.size,
                actual: bytes.len(),
            });
        }
        let values = layout
            .fields
            .iter()
            .map(|f| f.codec.decode(bytes, f.offset).map_err(|e| e.at(&f.name, 0)))
            .collect::<Result<Vec<_>>>()?;
        debug!(layout = layout.name, size = layout.size, "decoded record");
        Ok(Self {
            layout,
            raw: bytes.to_vec(),
            values,
        })
    }

    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    /// Current bytes of the whole record.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.layout.index_of(name).map(|i| &self.values[i])
    }

    pub fn value(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| CodecError::UnknownField(name.to_string()))
    }

    pub fn raw(&self, name: &str) -> Result<&[u8]> {
        Ok(&self.raw[self.layout.range(name)?])
    }

    pub fn field_range(&self, name: &str) -> Result<Range<usize>> {
        self.layout.range(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &Value)> {
        self.layout.fields.iter().zip(&self.values)
    }

    pub fn raw_items(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.layout
            .fields
            .iter()
            .map(|f| (f.name(), &self.raw[f.range()]))
    }

    /// Names of undecoded filler fields, in layout order.
    pub fn hidden_fields(&self) -> impl Iterator<Item = &str> {
        self.layout
            .fields
            .iter()
            .filter(|f| f.is_hidden())
            .map(Field::name)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.layout.size];
        self.encode_into(&mut out)?;
        Ok(out)
    }

    pub fn encode_into(&self, out: &mut [u8]) -> Result<()> {
        if out.len() != self.layout.size {
            return Err(CodecError::LayoutMismatch {
                field: String::new(),
                offset: 0,
                expected: self.layout.size,
                actual: out.len(),
            });
        }
        for (field, value) in self.iter() {
            field
                .codec
                .encode(value, out, field.offset)
                .map_err(|e| e.at(&field.name, 0))?;
        }
        Ok(())
    }

    /// Replace one field. The value is encoded into a scratch copy first, so a
    /// rejected value leaves the record untouched. The stored value is the
    /// re-decoded form, so names given for enums come back as full members.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let index = self
            .layout
            .index_of(name)
            .ok_or_else(|| CodecError::UnknownField(name.to_string()))?;
        let field = &self.layout.fields[index];
        if field.codec.is_derived() {
            return Err(CodecError::invalid_mutation(
                name,
                "value is recomputed on every encode",
            ));
        }

        let mut scratch = self.raw.clone();
        field
            .codec
            .encode(&value, &mut scratch, field.offset)
            .map_err(|e| e.at(name, 0))?;
        self.layout.refresh_checksums(&mut scratch)?;
        let decoded = field
            .codec
            .decode(&scratch, field.offset)
            .map_err(|e| e.at(name, 0))?;

        debug!(layout = self.layout.name, field = name, "field updated");
        self.raw = scratch;
        self.values[index] = decoded;
        Ok(())
    }

    /// Edit a field in place through a closure, with the same atomicity as [`Record::set`].
    pub fn update<F>(&mut self, name: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Value) -> Result<()>,
    {
        let mut value = self.value(name)?.clone();
        edit(&mut value).map_err(|e| e.at(name, 0))?;
        self.set(name, value)
    }

    pub fn set_path(&mut self, path: &str, value: Value) -> Result<()> {
        match path.split_once('.') {
            None => self.set(path, value),
            Some((head, rest)) => self.update(head, |v| set_nested(v, rest, value)),
        }
    }
}

fn set_nested(target: &mut Value, path: &str, value: Value) -> Result<()> {
    let (head, rest) = match path.split_once('.') {
        Some((h, r)) => (h, Some(r)),
        None => (path, None),
    };
    if let Some(items) = target.as_list_mut() {
        let i: usize = head
            .parse()
            .map_err(|_| CodecError::UnknownField(path.to_string()))?;
        let item = items
            .get_mut(i)
            .ok_or_else(|| CodecError::UnknownField(path.to_string()))?;
        return match rest {
            Some(rest) => set_nested(item, rest, value).map_err(|e| e.at(head, 0)),
            None => {
                *item.clean_mut() = value;
                Ok(())
            }
        };
    }
    let record = target
        .as_record_mut()
        .ok_or_else(|| CodecError::UnknownField(path.to_string()))?;
    match rest {
        Some(rest) => record
            .update(head, |v| set_nested(v, rest, value)),
        None => record.set(head, value),
    }
}

/// Top-level fields whose bytes differ between two records of one layout.
/// `keys` restricts the comparison to the named fields.
pub fn raw_diff<'a>(a: &'a Record, b: &Record, keys: Option<&[&str]>) -> Result<Vec<&'a str>> {
    if !std::ptr::eq(a.layout, b.layout) {
        warn!(a = a.layout.name, b = b.layout.name, "raw_diff across layouts");
        return Err(CodecError::LayoutMismatch {
            field: String::new(),
            offset: 0,
            expected: a.layout.size,
            actual: b.layout.size,
        });
    }
    Ok(a.layout
        .fields
        .iter()
        .filter(|f| keys.is_none_or(|keys| keys.contains(&f.name())))
        .filter(|f| a.raw[f.range()] != b.raw[f.range()])
        .map(Field::name)
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::codec::checksum::ChecksumSpec;
    use crate::codec::primitive::Primitive;
    use crate::error::ErrorKind;

    static INNER: LazyLock<Layout> = LazyLock::new(|| {
        Layout::builder("inner")
            .field("a", Codec::Prim(Primitive::U8))
            .field("b", Codec::Prim(Primitive::F32))
            .build_sized(5)
    });

    static OUTER: LazyLock<Layout> = LazyLock::new(|| {
        Layout::builder("outer")
            .field("count", Codec::Prim(Primitive::U16))
            .field("name", Codec::Str(6))
            .field("pair", Codec::array(Codec::raw_copy(Codec::Record(&INNER)), 2))
            .bytes("_unk", 3)
            .field("checksum", Codec::Checksum(ChecksumSpec::new(21, 18)))
            .build_sized(25)
    });

    fn sample() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&7u16.to_le_bytes());
        buf.extend_from_slice(b"Emil\0\0");
        buf.push(1);
        buf.extend_from_slice(&1.5f32.to_le_bytes());
        buf.push(2);
        buf.extend_from_slice(&f32::from_bits(0x7fc0_1234).to_le_bytes());
        buf.extend_from_slice(&[9, 8, 7]);
        let sum: u32 = buf[..18].iter().map(|&b| u32::from(b)).sum();
        buf.extend_from_slice(&sum.to_le_bytes());
        buf
    }

    #[test]
    fn offsets_are_cumulative() {
        assert_eq!(OUTER.range("name").expect("name"), 2..8);
        assert_eq!(OUTER.range("pair").expect("pair"), 8..18);
        assert_eq!(OUTER.range("checksum").expect("checksum"), 21..25);
    }

    #[test]
    fn decode_then_encode_is_byte_exact() {
        let bytes = sample();
        let rec = Record::decode(&OUTER, &bytes).expect("decode");
        assert_eq!(rec.get("name"), Some(&Value::Str("Emil".into())));
        assert_eq!(rec.raw("_unk").expect("raw"), &[9, 8, 7]);
        assert_eq!(rec.encode().expect("encode"), bytes);
    }

    #[test]
    fn failed_set_leaves_record_untouched() {
        let bytes = sample();
        let mut rec = Record::decode(&OUTER, &bytes).expect("decode");
        let err = rec
            .set("name", Value::Str("Popola!".into()))
            .expect_err("too long");
        assert_eq!(err.kind(), ErrorKind::InvalidMutation);
        assert_eq!(rec.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn set_refreshes_checksum() {
        let mut rec = Record::decode(&OUTER, &sample()).expect("decode");
        rec.set("count", Value::UInt(8)).expect("set");
        let encoded = rec.encode().expect("encode");
        assert_eq!(encoded.as_slice(), rec.as_bytes());
        Record::decode(&OUTER, &encoded).expect("checksum still valid");
    }

    #[test]
    fn nested_set_touches_only_one_element() {
        let bytes = sample();
        let mut rec = Record::decode(&OUTER, &bytes).expect("decode");
        rec.set_path("pair.0.a", Value::UInt(5)).expect("set nested");

        let out = rec.encode().expect("encode");
        assert_eq!(out[8], 5);
        // the NaN payload in the sibling survives untouched
        assert_eq!(&out[13..18], &bytes[13..18]);
    }

    #[test]
    fn checksum_mismatch_is_located() {
        let mut bytes = sample();
        bytes[21] ^= 0x01;
        let err = Record::decode(&OUTER, &bytes).expect_err("bad checksum");
        assert_eq!(err.kind(), ErrorKind::ChecksumMismatch);
        assert_eq!(err.field(), Some("checksum"));
        assert_eq!(err.offset(), Some(21));
    }

    #[test]
    fn raw_diff_names_changed_fields() {
        let a = Record::decode(&OUTER, &sample()).expect("decode");
        let mut b = a.clone();
        b.set("count", Value::UInt(1)).expect("set");
        assert_eq!(raw_diff(&a, &b, None).expect("diff"), vec!["count", "checksum"]);
        assert_eq!(
            raw_diff(&a, &b, Some(&["name", "count"])).expect("diff"),
            vec!["count"]
        );
    }
}
