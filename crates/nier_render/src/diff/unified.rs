use super::sequence::{Opcode, SequenceMatcher, Tag};

/// `start,len` with 1-based starts; a one-line range is just its line
/// number and an empty range names the line before it.
pub fn format_range(start: usize, stop: usize) -> String {
    match stop - start {
        1 => format!("{}", start + 1),
        0 => format!("{start},0"),
        len => format!("{},{len}", start + 1),
    }
}

/// `@@ -a +b @@` for one group, optionally followed by a label.
pub fn hunk_header(group: &[Opcode], label: &str) -> String {
    let (Some(first), Some(last)) = (group.first(), group.last()) else {
        return String::new();
    };
    let header = format!(
        "@@ -{} +{} @@",
        format_range(first.a_start, last.a_end),
        format_range(first.b_start, last.b_end)
    );
    if label.is_empty() { header } else { format!("{header} {label}") }
}

/// Unified diff of two line lists, hunk headers and prefixed lines only (no
/// `---`/`+++` file header).
pub fn unified_diff(a: &[&str], b: &[&str], context: usize, label: &str) -> Vec<String> {
    let mut out = Vec::new();
    for group in SequenceMatcher::new(a, b, true).grouped_opcodes(context) {
        out.push(hunk_header(&group, label));
        for code in &group {
            if code.tag == Tag::Equal {
                out.extend(a[code.a_start..code.a_end].iter().map(|l| format!(" {l}")));
                continue;
            }
            if matches!(code.tag, Tag::Replace | Tag::Delete) {
                out.extend(a[code.a_start..code.a_end].iter().map(|l| format!("-{l}")));
            }
            if matches!(code.tag, Tag::Replace | Tag::Insert) {
                out.extend(b[code.b_start..code.b_end].iter().map(|l| format!("+{l}")));
            }
        }
    }
    out
}
