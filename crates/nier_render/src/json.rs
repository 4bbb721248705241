//! Decoded values as pseudo-JSON: stable key order, four-space indent, and
//! a one-row-per-entry form for long maps such as the quest log.

use std::io;

use nier_core::Value;
use nier_core::codec::flags::FlagSet;
use nier_core::codec::quests::{QuestLog, QuestProgress};
use nier_core::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Keep `_`-prefixed filler fields and anonymous flag bits.
    pub include_hidden: bool,
    pub sort_keys: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            include_hidden: false,
            sort_keys: true,
        }
    }
}

pub fn value_to_json(value: &Value, options: &JsonOptions) -> JsonValue {
    let json = build(value, options);
    if options.sort_keys { sorted(json) } else { json }
}

pub fn record_to_json(record: &Record, options: &JsonOptions) -> JsonValue {
    let json = build_record(record, options);
    if options.sort_keys { sorted(json) } else { json }
}

fn build(value: &Value, options: &JsonOptions) -> JsonValue {
    match value {
        Value::Int(v) => JsonValue::from(*v),
        Value::UInt(v) => JsonValue::from(*v),
        Value::F32(v) => float(f64::from(*v)),
        Value::F64(v) => float(*v),
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::Bytes(b) => bytes_to_json(b),
        Value::Enum(e) => e.name().map_or(JsonValue::Null, JsonValue::from),
        Value::DateTime(t) if t.is_set() => JsonValue::String(t.to_string()),
        Value::DateTime(_) => JsonValue::Null,
        Value::Flags(flags) => flags_to_json(flags, options),
        Value::Quests(log) => quests_to_json(log, options),
        Value::Record(record) => build_record(record, options),
        Value::List(items) => JsonValue::Array(items.iter().map(|v| build(v, options)).collect()),
        Value::Raw(inner) => build(inner.value(), options),
    }
}

fn build_record(record: &Record, options: &JsonOptions) -> JsonValue {
    let mut out = JsonMap::new();
    for (field, value) in record.iter() {
        if field.is_hidden() && !options.include_hidden {
            continue;
        }
        out.insert(field.name().to_string(), build(value, options));
    }
    JsonValue::Object(out)
}

/// `sort_keys`, four-space indented JSON. Non-ASCII text is written as is.
pub fn pseudo_json(value: &JsonValue) -> String {
    write_with(value, PrettyFormatter::with_indent(b"    "))
}

/// One line per top-level entry: `"key": {compact json}`, wrapped in
/// brackets. Diffs of these rows show which entry changed at a glance.
pub fn pseudo_json_rows(value: &JsonValue) -> String {
    let JsonValue::Object(map) = value else {
        return pseudo_json(value);
    };
    let last = map.len().saturating_sub(1);
    let rows: Vec<String> = map
        .iter()
        .enumerate()
        .map(|(i, (key, val))| {
            format!(
                "    {}: {}{}",
                write_with(&JsonValue::String(key.clone()), SpacedFormatter),
                write_with(val, SpacedFormatter),
                if i != last { "," } else { "" }
            )
        })
        .collect();
    format!("[\n{}\n]", rows.join("\n"))
}

fn write_with<F: Formatter>(value: &JsonValue, formatter: F) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .expect("serializing a JSON value into memory cannot fail");
    String::from_utf8(buf).expect("serde_json writes UTF-8")
}

/// Compact output with a space after `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

fn float(v: f64) -> JsonValue {
    Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}

/// Text if the bytes are valid UTF-8, grouped hex otherwise.
fn bytes_to_json(bytes: &[u8]) -> JsonValue {
    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(nier_core::value::hex_groups(bytes)),
    }
}

fn flags_to_json(flags: &FlagSet, options: &JsonOptions) -> JsonValue {
    let labels = flags.array().labels();
    let render = |on: bool| match labels {
        Some(l) => JsonValue::from(if on { l.set } else { l.clear }),
        None => JsonValue::Bool(on),
    };

    let mut out = JsonMap::new();
    for (name, on) in flags.named() {
        out.insert(name.to_string(), render(on));
    }
    if options.include_hidden {
        for (bit, on) in flags.anonymous() {
            out.insert(format!("_bit{bit}"), render(on));
        }
    }
    JsonValue::Object(out)
}

fn quests_to_json(log: &QuestLog, options: &JsonOptions) -> JsonValue {
    JsonValue::Object(
        log.iter()
            .map(|(name, progress)| (name.to_string(), progress_to_json(progress, options)))
            .collect(),
    )
}

fn progress_to_json(progress: &QuestProgress, options: &JsonOptions) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("started".into(), progress.started.into());
    if let Some(stage) = progress.stage {
        out.insert("stage".into(), stage.into());
    }
    if let Some(partial) = progress.partial_done {
        out.insert("partial_done".into(), partial.into());
    }
    if options.include_hidden {
        if let Some(second) = progress.second_started {
            out.insert("_second_started".into(), second.into());
        }
    }
    out.insert("done".into(), progress.done.into());
    JsonValue::Object(out)
}

fn sorted(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            JsonValue::Object(entries.into_iter().map(|(k, v)| (k, sorted(v))).collect())
        }
        JsonValue::Array(items) => JsonValue::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}
