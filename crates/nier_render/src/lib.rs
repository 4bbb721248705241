//! Plain-text renderings of decoded NieR Replicant saves: pseudo-JSON,
//! xxd-style hex views and field-by-field diffs. Output carries no colour;
//! callers that want it can key off the `-`/`+`/`@@` line prefixes.

pub mod diff;
pub mod hexdump;
pub mod json;

pub use diff::{
    ByteDiffMode, DiffEntry, DiffMode, DiffOptions, DiffReport, FieldDiff, FlagChange, Side,
    bit_diff_index, byte_hunk_diff, changed_bits, diff_bundles, diff_records, diff_slots,
    flag_changes, render_diff,
};
pub use hexdump::{HexViewOptions, HideEmpty, hex_row, view, view_field, view_unknowns};
pub use json::{JsonOptions, pseudo_json, pseudo_json_rows, record_to_json, value_to_json};
