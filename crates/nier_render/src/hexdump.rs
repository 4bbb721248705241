//! xxd-style rows: `prefix hex-in-4-byte-groups  |  text`.

use std::fmt::Write as _;

use nier_core::Result;
use nier_core::record::Record;
use nier_core::value::hex_groups;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideEmpty {
    Never,
    Always,
    /// Hide only when the data spans more than this many rows.
    Auto(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HexViewOptions {
    pub per_line: usize,
    pub hide_empty: HideEmpty,
}

impl Default for HexViewOptions {
    fn default() -> Self {
        Self {
            per_line: 40,
            hide_empty: HideEmpty::Auto(10),
        }
    }
}

/// One row. With `fill`, both columns are padded to the width `fill` bytes
/// would take, so short final rows line up with full ones.
pub fn hex_row(prefix: &str, data: &[u8], fill: usize) -> String {
    let mut hex = hex_groups(data);
    let mut text = printable(data);
    if fill > 0 {
        let hex_width = fill * 2 + fill / 4 - 1;
        pad_to(&mut hex, hex_width);
        pad_to(&mut text, fill);
    }
    format!("{prefix} {hex}  |  {text}")
}

/// Lossy UTF-8 with control characters shown as `.`; CR, LF and tab are
/// escaped instead.
pub fn printable(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for c in String::from_utf8_lossy(data).chars() {
        match c {
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push('.'),
            c => out.push(c),
        }
    }
    out
}

/// `0x` followed by an offset zero-padded to as many hex digits as `len` has.
pub fn offset_label(offset: usize, len: usize) -> String {
    let width = format!("{len:X}").len();
    format!("0x{offset:0width$X}:")
}

/// Hex view of `data`. Runs of three or more all-zero rows collapse to a
/// single `...`, keeping the first zero row of the run and any zero row
/// right before real data or the end.
pub fn view(data: &[u8], options: &HexViewOptions) -> String {
    let per_line = options.per_line.max(1);
    let hide = match options.hide_empty {
        HideEmpty::Never => false,
        HideEmpty::Always => true,
        HideEmpty::Auto(rows) => data.len() > rows * per_line,
    };

    let rows: Vec<&[u8]> = data.chunks(per_line).collect();
    let is_empty = |row: &[u8]| row.len() == per_line && row.iter().all(|&b| b == 0);

    let mut out = String::new();
    let mut need_ellipsis = true;
    for (i, row) in rows.iter().enumerate() {
        let skip = hide
            && i > 0
            && i + 1 < rows.len()
            && is_empty(row)
            && is_empty(rows[i - 1])
            && is_empty(rows[i + 1]);
        if skip {
            if need_ellipsis {
                out.push_str("...\n");
                need_ellipsis = false;
            }
            continue;
        }
        need_ellipsis = true;
        writeln!(
            out,
            "{}",
            hex_row(&offset_label(i * per_line, data.len()), row, per_line)
        )
        .expect("writing to String cannot fail");
    }
    out
}

/// Hex view of one field's raw bytes.
pub fn view_field(record: &Record, name: &str, options: &HexViewOptions) -> Result<String> {
    Ok(view(record.raw(name)?, options))
}

/// Every undecoded filler field of `record`, each under a banner.
pub fn view_unknowns(record: &Record, options: &HexViewOptions) -> Result<String> {
    let mut out = String::new();
    for name in record.hidden_fields() {
        writeln!(out, "\n{bar}  {name}  {bar}", bar = "=".repeat(30))
            .expect("writing to String cannot fail");
        out.push_str(&view_field(record, name, options)?);
    }
    Ok(out)
}

fn pad_to(s: &mut String, width: usize) {
    let len = s.chars().count();
    if len < width {
        s.extend(std::iter::repeat_n(' ', width - len));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_the_fill_width() {
        assert_eq!(
            hex_row("0x0:", b"Nier\n", 8),
            "0x0: 4e696572 0a        |  Nier\\n  "
        );
        assert_eq!(hex_row("-", &[0, 1, 2, 3], 0), "- 00010203  |  ....");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(printable(&[b'a', 0xff, b'\t']), "a\u{fffd}\\t");
    }

    #[test]
    fn offsets_are_as_wide_as_the_length() {
        assert_eq!(offset_label(0, 0x14), "0x00:");
        assert_eq!(offset_label(0x28, 0x1234), "0x0028:");
        assert_eq!(offset_label(0, 0), "0x0:");
    }

    #[test]
    fn long_zero_runs_collapse() {
        let mut data = vec![0u8; 8 * 6];
        data[0] = 1;
        data[47] = 2;
        let options = HexViewOptions {
            per_line: 8,
            hide_empty: HideEmpty::Always,
        };
        let lines: Vec<_> = view(&data, &options).lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("0x00: 01000000"));
        assert!(lines[1].starts_with("0x08: "));
        assert_eq!(lines[2], "...");
        assert!(lines[3].starts_with("0x20: "));
        assert!(lines[4].starts_with("0x28: "));
    }

    #[test]
    fn short_data_is_never_collapsed_by_default() {
        let data = vec![0u8; 40 * 10];
        let text = view(&data, &HexViewOptions::default());
        assert_eq!(text.lines().count(), 10);
        assert!(!text.contains("..."));

        let data = vec![0u8; 40 * 11];
        let text = view(&data, &HexViewOptions::default());
        assert_eq!(text.lines().count(), 3);
    }
}
