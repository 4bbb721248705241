//! Field-by-field comparison of two records sharing a layout.
//!
//! Fields are compared by raw bytes. Each differing field is rendered one of
//! three ways: scalars as a `-`/`+` pair, nested values as a unified diff of
//! their pseudo-JSON, and long byte blobs as hunks of hex rows.

pub mod sequence;
pub mod unified;

use std::fmt;

use nier_core::codec::flags::FlagSet;
use nier_core::layout::SectionId;
use nier_core::nier::{SaveBundle, SaveSlot};
use nier_core::record::{Record, raw_diff};
use nier_core::{CodecError, Result, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::hexdump::{hex_row, offset_label};
use crate::json::{JsonOptions, pseudo_json, pseudo_json_rows, value_to_json};

pub use sequence::{Opcode, SequenceMatcher, Tag};
pub use unified::{format_range, unified_diff};

/// Long flat maps diffed one entry per line.
const ROW_KEYS: &[&str] = &["quests", "quests_b"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteDiffMode {
    /// Rows aligned with the sequence matcher, so inserted or shifted rows
    /// show up as such.
    #[default]
    Aligned,
    /// Row `n` of one side against row `n` of the other.
    Positional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Bytes per hex row.
    pub per_line: usize,
    /// Context rows around byte hunks.
    pub context: usize,
    /// Context lines around structural hunks.
    pub structural_context: usize,
    /// Byte fields longer than this are diffed as hex rows; shorter ones
    /// inline. `None` always inlines.
    pub max_inline_len: Option<usize>,
    /// Diff nested values as raw bytes instead of pseudo-JSON.
    pub force_bytes: bool,
    pub byte_mode: ByteDiffMode,
    /// Show filler fields inside nested values.
    pub include_hidden: bool,
    /// Only compare these fields.
    pub keys: Option<Vec<String>>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            per_line: 20,
            context: 3,
            structural_context: 2,
            max_inline_len: Some(30),
            force_bytes: false,
            byte_mode: ByteDiffMode::Aligned,
            include_hidden: true,
            keys: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffMode {
    Scalar,
    Structural,
    Bytes,
}

/// One side of a field comparison.
#[derive(Debug, Clone, Copy)]
pub struct Side<'a> {
    pub value: &'a Value,
    pub raw: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub key: String,
    pub mode: DiffMode,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffEntry {
    Field(FieldDiff),
    Section(DiffReport),
}

/// Differences between two records, or two bundles with one nested report
/// per differing header or slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffReport {
    /// Dotted location of this record within its bundle; empty at the top.
    pub path: String,
    pub from: String,
    pub to: String,
    pub entries: Vec<DiffEntry>,
}

impl DiffReport {
    fn new(path: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from: from.into(),
            to: to.into(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full dotted path of every differing field, e.g. `slots.1.money`.
    pub fn changed_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for entry in &self.entries {
            match entry {
                DiffEntry::Field(field) if self.path.is_empty() => out.push(field.key.clone()),
                DiffEntry::Field(field) => out.push(format!("{}.{}", self.path, field.key)),
                DiffEntry::Section(section) => out.extend(section.changed_paths()),
            }
        }
        out
    }

    /// The rendered report. `---`/`+++` labels head each report with changes.
    pub fn lines(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut out = vec![format!("--- {}", self.from), format!("+++ {}", self.to)];
        for entry in &self.entries {
            match entry {
                DiffEntry::Field(field) => out.extend(field.lines.iter().cloned()),
                DiffEntry::Section(section) => out.extend(section.lines()),
            }
        }
        out
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Which rendering a differing field gets.
pub fn choose_mode(value: &Value, raw_len: usize, options: &DiffOptions) -> DiffMode {
    let is_bytes = matches!(value.clean(), Value::Bytes(_));
    let long = options.max_inline_len.is_some_and(|max| raw_len > max);
    if value.is_scalar() {
        DiffMode::Scalar
    } else if is_bytes {
        if long { DiffMode::Bytes } else { DiffMode::Scalar }
    } else if options.force_bytes {
        DiffMode::Bytes
    } else {
        DiffMode::Structural
    }
}

/// Render one differing field in `mode`.
pub fn render_diff(
    key: &str,
    a: Side<'_>,
    b: Side<'_>,
    mode: DiffMode,
    options: &DiffOptions,
) -> Vec<String> {
    match mode {
        DiffMode::Scalar => vec![
            format!("@@ {key} @@"),
            format!("- {}", a.value),
            format!("+ {}", b.value),
        ],
        DiffMode::Structural => {
            let json = JsonOptions {
                include_hidden: options.include_hidden,
                sort_keys: true,
            };
            let render = |v: &Value| {
                let value = value_to_json(v, &json);
                if ROW_KEYS.contains(&key) {
                    pseudo_json_rows(&value)
                } else {
                    pseudo_json(&value)
                }
            };
            let (text_a, text_b) = (render(a.value), render(b.value));
            let lines_a: Vec<&str> = text_a.lines().collect();
            let lines_b: Vec<&str> = text_b.lines().collect();
            let mut out = vec![format!("@@ {key} @@")];
            out.extend(unified_diff(&lines_a, &lines_b, options.structural_context, key));
            out
        }
        DiffMode::Bytes => byte_hunk_diff(a.raw, b.raw, key, options),
    }
}

/// Hex-row hunks for two byte strings, in the configured [`ByteDiffMode`].
pub fn byte_hunk_diff(a: &[u8], b: &[u8], label: &str, options: &DiffOptions) -> Vec<String> {
    match options.byte_mode {
        ByteDiffMode::Aligned => aligned_byte_diff(a, b, label, options.per_line, options.context),
        ByteDiffMode::Positional => {
            positional_byte_diff(a, b, label, options.per_line, options.context)
        }
    }
}

/// Rows aligned as opaque tokens. If any hunk spans more than
/// `context * 2 + 10` rows the alignment is redone without the popularity
/// heuristic, which otherwise lets a run of zero rows match across
/// unrelated regions.
pub fn aligned_byte_diff(
    a: &[u8],
    b: &[u8],
    label: &str,
    per_line: usize,
    context: usize,
) -> Vec<String> {
    let per_line = per_line.max(1);
    let rows_a: Vec<&[u8]> = a.chunks(per_line).collect();
    let rows_b: Vec<&[u8]> = b.chunks(per_line).collect();

    let threshold = context * 2 + 10;
    let mut groups = SequenceMatcher::new(&rows_a, &rows_b, true).grouped_opcodes(context);
    let too_wide = groups.iter().any(|group| {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            return false;
        };
        last.a_end - first.a_start > threshold || last.b_end - first.b_start > threshold
    });
    if too_wide {
        trace!(label, threshold, "hunk too wide, realigning without autojunk");
        groups = SequenceMatcher::new(&rows_a, &rows_b, false).grouped_opcodes(context);
    }

    let width = a.len().max(b.len());
    let row = |prefix: char, index: usize, data: &[u8]| {
        hex_row(
            &format!("{prefix} {}", offset_label(index * per_line, width)),
            data,
            per_line,
        )
    };

    let mut out = Vec::new();
    for group in groups {
        out.push(unified::hunk_header(&group, label));
        for code in &group {
            let a_rows = code.a_start..code.a_end;
            let b_rows = code.b_start..code.b_end;
            match code.tag {
                Tag::Equal => out.extend(a_rows.map(|i| row(' ', i, rows_a[i]))),
                Tag::Delete => out.extend(a_rows.map(|i| row('-', i, rows_a[i]))),
                Tag::Insert => out.extend(b_rows.map(|i| row('+', i, rows_b[i]))),
                Tag::Replace => {
                    out.extend(a_rows.map(|i| row('-', i, rows_a[i])));
                    out.extend(b_rows.map(|i| row('+', i, rows_b[i])));
                }
            }
        }
    }
    out
}

/// Rows compared by position, each changed row shown as a `-`/`+` pair.
/// Changes with at most `context * 2` unchanged rows between them share a
/// hunk.
pub fn positional_byte_diff(
    a: &[u8],
    b: &[u8],
    label: &str,
    per_line: usize,
    context: usize,
) -> Vec<String> {
    let per_line = per_line.max(1);
    let rows_a: Vec<&[u8]> = a.chunks(per_line).collect();
    let rows_b: Vec<&[u8]> = b.chunks(per_line).collect();
    let count = rows_a.len().max(rows_b.len());
    let changed: Vec<usize> = (0..count)
        .filter(|&i| rows_a.get(i) != rows_b.get(i))
        .collect();

    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for &i in &changed {
        let start = i.saturating_sub(context);
        let end = (i + context + 1).min(count);
        match hunks.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => hunks.push((start, end)),
        }
    }

    let width = a.len().max(b.len());
    let mut out = Vec::new();
    for (start, end) in hunks {
        let range = format_range(start, end);
        out.push(if label.is_empty() {
            format!("@@ -{range} +{range} @@")
        } else {
            format!("@@ -{range} +{range} @@ {label}")
        });
        for i in start..end {
            let offset = offset_label(i * per_line, width);
            if changed.binary_search(&i).is_ok() {
                if let Some(row) = rows_a.get(i) {
                    out.push(hex_row(&format!("- {offset}"), row, per_line));
                }
                if let Some(row) = rows_b.get(i) {
                    out.push(hex_row(&format!("+ {offset}"), row, per_line));
                }
            } else {
                out.push(hex_row(&format!("  {offset}"), rows_a[i], per_line));
            }
        }
    }
    out
}

/// The single bit that differs between two bytes, 0 being the least
/// significant.
pub fn bit_diff_index(a: u8, b: u8) -> Result<u32> {
    let diff = a ^ b;
    if diff.count_ones() != 1 {
        return Err(CodecError::BitDiffAmbiguity {
            a,
            b,
            bits: diff.count_ones(),
        });
    }
    Ok(diff.trailing_zeros())
}

/// Every differing bit between two equally long byte strings, numbered
/// `byte * 8 + bit` with bits least significant first.
pub fn changed_bits(a: &[u8], b: &[u8]) -> Result<Vec<usize>> {
    if a.len() != b.len() {
        return Err(CodecError::LayoutMismatch {
            field: String::new(),
            offset: 0,
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b)
        .enumerate()
        .flat_map(|(i, (&x, &y))| {
            let diff = x ^ y;
            (0..8).filter(move |bit| diff & (1 << bit) != 0).map(move |bit| i * 8 + bit)
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagChange {
    pub bit: usize,
    /// `None` for anonymous placeholder bits.
    pub name: Option<&'static str>,
    pub from: bool,
    pub to: bool,
}

/// Flags whose value differs between two decodings of the same flag array.
pub fn flag_changes(a: &FlagSet, b: &FlagSet) -> Vec<FlagChange> {
    a.bits()
        .iter()
        .zip(b.bits())
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(bit, (&from, &to))| FlagChange {
            bit,
            name: a.array().name_at(bit),
            from,
            to,
        })
        .collect()
}

/// Diff two records that share a layout.
pub fn diff_records(a: &Record, b: &Record, options: &DiffOptions) -> Result<DiffReport> {
    let name = a.layout().name();
    diff_labeled("", name, name, a, b, options)
}

pub fn diff_slots(a: &SaveSlot, b: &SaveSlot, options: &DiffOptions) -> Result<DiffReport> {
    diff_labeled(
        "",
        a.to_string(),
        b.to_string(),
        a.record(),
        b.record(),
        options,
    )
}

/// Diff two bundles section by section. The header and each slot pair get
/// their own nested report; slots are paired by index.
///
/// `keys` may name `header` or `slots` to select whole sections, and any
/// other names select fields within them.
pub fn diff_bundles(a: &SaveBundle, b: &SaveBundle, options: &DiffOptions) -> Result<DiffReport> {
    let selection = SectionSelection::new(options.keys.as_deref());
    let inner = DiffOptions {
        keys: selection.fields.clone(),
        ..options.clone()
    };

    let mut report = DiffReport::new("", bundle_label(a), bundle_label(b));
    if selection.header {
        let path = SectionId::Header.path();
        let section = diff_labeled(
            &path,
            &path,
            &path,
            a.header().record(),
            b.header().record(),
            &inner,
        )?;
        if !section.is_empty() {
            report.entries.push(DiffEntry::Section(section));
        }
    }
    if selection.slots {
        for (i, (slot_a, slot_b)) in a.slots().zip(b.slots()).enumerate() {
            let path = SectionId::Slot(i as u8).path();
            let section = diff_labeled(
                &path,
                slot_a.to_string(),
                slot_b.to_string(),
                slot_a.record(),
                slot_b.record(),
                &inner,
            )
            .map_err(|e| e.at(&path, 0))?;
            if !section.is_empty() {
                report.entries.push(DiffEntry::Section(section));
            }
        }
    }
    if selection.tail {
        let tail_a = a.section_bytes(SectionId::Tail)?;
        let tail_b = b.section_bytes(SectionId::Tail)?;
        if tail_a != tail_b {
            let key = SectionId::Tail.path();
            report.entries.push(DiffEntry::Field(FieldDiff {
                lines: byte_hunk_diff(&tail_a, &tail_b, &key, options),
                key,
                mode: DiffMode::Bytes,
            }));
        }
    }
    debug!(changed = report.changed_paths().len(), "diffed bundles");
    Ok(report)
}

fn diff_labeled(
    path: &str,
    from: impl Into<String>,
    to: impl Into<String>,
    a: &Record,
    b: &Record,
    options: &DiffOptions,
) -> Result<DiffReport> {
    let keys: Option<Vec<&str>> = options
        .keys
        .as_ref()
        .map(|keys| keys.iter().map(String::as_str).collect());
    let mut report = DiffReport::new(path, from, to);
    for key in raw_diff(a, b, keys.as_deref())? {
        let side_a = Side {
            value: a.value(key)?,
            raw: a.raw(key)?,
        };
        let side_b = Side {
            value: b.value(key)?,
            raw: b.raw(key)?,
        };
        let mode = choose_mode(side_a.value, side_a.raw.len(), options);
        report.entries.push(DiffEntry::Field(FieldDiff {
            key: key.to_string(),
            mode,
            lines: render_diff(key, side_a, side_b, mode, options),
        }));
    }
    debug!(
        layout = a.layout().name(),
        path,
        changed = report.entries.len(),
        "diffed record"
    );
    Ok(report)
}

fn bundle_label(bundle: &SaveBundle) -> String {
    format!(
        "GAMEDATA ({:?}, {} slots)",
        bundle.version(),
        bundle.slot_count()
    )
}

struct SectionSelection {
    header: bool,
    slots: bool,
    tail: bool,
    fields: Option<Vec<String>>,
}

impl SectionSelection {
    fn new(keys: Option<&[String]>) -> Self {
        let Some(keys) = keys else {
            return Self {
                header: true,
                slots: true,
                tail: true,
                fields: None,
            };
        };
        let named = |section: SectionId| keys.contains(&section.path());
        let fields: Vec<String> = keys
            .iter()
            .filter(|k| !matches!(k.as_str(), "header" | "slots" | "tail"))
            .cloned()
            .collect();
        let any_fields = !fields.is_empty();
        Self {
            header: named(SectionId::Header) || any_fields,
            slots: keys.iter().any(|k| k == "slots") || any_fields,
            tail: named(SectionId::Tail),
            fields: any_fields.then_some(fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bit_changes_are_located() {
        assert_eq!(bit_diff_index(0b0000_0100, 0b0000_0000).expect("one bit"), 2);
        assert_eq!(bit_diff_index(0x00, 0x80).expect("one bit"), 7);

        let err = bit_diff_index(0b11, 0b00).expect_err("two bits");
        assert_eq!(err.kind(), nier_core::ErrorKind::BitDiffAmbiguity);
        assert!(matches!(err, CodecError::BitDiffAmbiguity { bits: 2, .. }));
        assert!(bit_diff_index(5, 5).is_err());
    }

    #[test]
    fn changed_bits_span_bytes() {
        let bits = changed_bits(&[0b0000_0001, 0b1000_0000], &[0, 0]).expect("same length");
        assert_eq!(bits, [0, 15]);
        assert!(changed_bits(&[0], &[0, 0]).is_err());
    }

    #[test]
    fn scalar_and_short_bytes_render_inline() {
        let options = DiffOptions::default();
        assert_eq!(choose_mode(&Value::Int(1), 4, &options), DiffMode::Scalar);
        assert_eq!(choose_mode(&Value::Bytes(vec![0; 30]), 30, &options), DiffMode::Scalar);
        assert_eq!(choose_mode(&Value::Bytes(vec![0; 31]), 31, &options), DiffMode::Bytes);
        assert_eq!(choose_mode(&Value::List(Vec::new()), 120, &options), DiffMode::Structural);

        let forced = DiffOptions {
            force_bytes: true,
            max_inline_len: None,
            ..DiffOptions::default()
        };
        assert_eq!(choose_mode(&Value::List(Vec::new()), 120, &forced), DiffMode::Bytes);
        assert_eq!(choose_mode(&Value::Bytes(vec![0; 31]), 31, &forced), DiffMode::Scalar);
    }

    #[test]
    fn scalar_render_is_a_minus_plus_pair() {
        let (a, b) = (Value::Int(50), Value::Int(75_000));
        let lines = render_diff(
            "money",
            Side { value: &a, raw: &[] },
            Side { value: &b, raw: &[] },
            DiffMode::Scalar,
            &DiffOptions::default(),
        );
        assert_eq!(lines, ["@@ money @@", "- 50", "+ 75000"]);
    }

    #[test]
    fn positional_hunks_merge_nearby_changes() {
        let a = vec![0u8; 4 * 16];
        let mut b = a.clone();
        b[4] = 1; // row 1
        b[4 * 6] = 1; // row 6
        b[4 * 13] = 1; // row 13
        let lines = positional_byte_diff(&a, &b, "x", 4, 2);
        let headers: Vec<_> = lines.iter().filter(|l| l.starts_with("@@")).collect();
        assert_eq!(headers, ["@@ -1,9 +1,9 @@ x", "@@ -12,5 +12,5 @@ x"]);
        assert_eq!(lines.iter().filter(|l| l.starts_with('-')).count(), 3);
    }

    #[test]
    fn sections_can_be_selected_by_name() {
        let all = SectionSelection::new(None);
        assert!(all.header && all.slots && all.tail && all.fields.is_none());

        let keys = vec!["header".to_string()];
        let header = SectionSelection::new(Some(&keys));
        assert!(header.header && !header.slots && !header.tail);
        assert!(header.fields.is_none());

        let keys = vec!["money".to_string()];
        let money = SectionSelection::new(Some(&keys));
        assert!(money.header && money.slots && !money.tail);
        assert_eq!(money.fields, Some(vec!["money".to_string()]));
    }
}
