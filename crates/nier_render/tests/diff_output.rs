mod common;

use nier_core::codec::quests::QuestProgress;
use nier_core::nier::BundleVersion;
use nier_core::{ErrorKind, Value};
use nier_render::{
    ByteDiffMode, DiffMode, DiffOptions, DiffReport, FieldDiff, FlagChange, HexViewOptions,
    byte_hunk_diff, diff_bundles, diff_records, diff_slots, flag_changes, hex_row, view_field,
    view_unknowns,
};

use common::{bundle, init_tracing, ramp, slot};

fn field<'a>(report: &'a DiffReport, key: &str) -> &'a FieldDiff {
    report
        .entries
        .iter()
        .find_map(|entry| match entry {
            nier_render::DiffEntry::Field(f) if f.key == key => Some(f),
            _ => None,
        })
        .expect("field in report")
}

#[test]
fn two_changed_bytes_make_one_hunk_on_the_first_row() {
    init_tracing();
    let a = ramp(40);
    let mut b = a.clone();
    b[10] = 0xaa;
    b[11] = 0xbb;

    for byte_mode in [ByteDiffMode::Aligned, ByteDiffMode::Positional] {
        let options = DiffOptions {
            byte_mode,
            ..DiffOptions::default()
        };
        let lines = byte_hunk_diff(&a, &b, "", &options);
        assert_eq!(lines.len(), 4, "{byte_mode:?}: {lines:#?}");
        assert_eq!(lines[0], "@@ -1,2 +1,2 @@");
        assert_eq!(lines[1], hex_row("- 0x00:", &a[..20], 20));
        assert_eq!(lines[2], hex_row("+ 0x00:", &b[..20], 20));
        assert_eq!(lines[3], hex_row("  0x14:", &a[20..], 20));
    }
}

#[test]
fn identical_bytes_have_no_hunks() {
    let a = ramp(100);
    assert!(byte_hunk_diff(&a, &a, "x", &DiffOptions::default()).is_empty());
}

#[test]
fn scalar_fields_diff_inline() {
    let report = diff_slots(&slot("Nier", 50), &slot("Nier", 75_000), &DiffOptions::default())
        .expect("same layout");
    assert_eq!(report.changed_paths(), ["money", "checksum"]);

    let money = field(&report, "money");
    assert_eq!(money.mode, DiffMode::Scalar);
    assert_eq!(money.lines, ["@@ money @@", "- 50", "+ 75000"]);

    let lines = report.lines();
    assert!(lines[0].starts_with("--- ["));
    assert!(lines[1].starts_with("+++ ["));
    assert!(report.to_string().ends_with('\n'));
}

#[test]
fn quest_log_diffs_one_quest_per_line() {
    let a = slot("Nier", 50);
    let mut b = a.clone();
    b.update_quest(
        "Herbal Remedies",
        QuestProgress {
            started: true,
            done: true,
            ..Default::default()
        },
    )
    .expect("quest");

    let report = diff_slots(&a, &b, &DiffOptions::default()).expect("diff");
    let quests = field(&report, "quests");
    assert_eq!(quests.mode, DiffMode::Structural);
    assert_eq!(quests.lines[0], "@@ quests @@");
    assert!(quests.lines[1].starts_with("@@ -") && quests.lines[1].ends_with(" @@ quests"));

    let removed: Vec<_> = quests.lines.iter().filter(|l| l.starts_with('-')).collect();
    let added: Vec<_> = quests.lines.iter().filter(|l| l.starts_with('+')).collect();
    assert_eq!(removed.len(), 1);
    assert_eq!(added.len(), 1);
    assert!(removed[0].contains("\"Herbal Remedies\": {\"done\": false, \"started\": false}"));
    assert!(added[0].contains("\"Herbal Remedies\": {\"done\": true, \"started\": true}"));
}

#[test]
fn forcing_bytes_shows_nested_values_as_hex() {
    let a = slot("Nier", 50);
    let mut b = a.clone();
    b.update_quest(
        "Herbal Remedies",
        QuestProgress {
            started: true,
            ..Default::default()
        },
    )
    .expect("quest");

    let options = DiffOptions {
        force_bytes: true,
        ..DiffOptions::default()
    };
    let report = diff_slots(&a, &b, &options).expect("diff");
    let quests = field(&report, "quests");
    assert_eq!(quests.mode, DiffMode::Bytes);
    assert!(quests.lines[0].starts_with("@@ -1"));
    assert!(quests.lines[0].ends_with(" @@ quests"));
}

#[test]
fn long_filler_diffs_as_hex_rows() {
    let a = slot("Nier", 50);
    let mut b = a.clone();
    let mut filler = vec![0u8; 100];
    filler[45] = 7;
    b.set("_unk15a1a1", Value::Bytes(filler)).expect("filler");

    let report = diff_slots(&a, &b, &DiffOptions::default()).expect("diff");
    let unk = field(&report, "_unk15a1a1");
    assert_eq!(unk.mode, DiffMode::Bytes);
    assert_eq!(unk.lines[0], "@@ -1,5 +1,5 @@ _unk15a1a1");
    assert_eq!(unk.lines.len(), 7);
    assert!(unk.lines[3].starts_with("- 0x28: 00000000"));
    assert!(unk.lines[4].starts_with("+ 0x28: 00000000 00070000"));

    // eleven-byte blobs stay inline
    let mut c = a.clone();
    c.set("quest_viewed_states", Value::Bytes(vec![1; 11])).expect("viewed");
    let report = diff_slots(&a, &c, &DiffOptions::default()).expect("diff");
    let viewed = field(&report, "quest_viewed_states");
    assert_eq!(viewed.mode, DiffMode::Scalar);
    assert_eq!(viewed.lines[2], "+ 01010101 01010101 010101");
}

#[test]
fn key_filter_limits_the_fields_compared() {
    let options = DiffOptions {
        keys: Some(vec!["money".to_string()]),
        ..DiffOptions::default()
    };
    let report =
        diff_slots(&slot("Nier", 50), &slot("Kainé", 75_000), &options).expect("diff");
    assert_eq!(report.changed_paths(), ["money"]);
}

#[test]
fn bundle_diff_recurses_into_sections() {
    init_tracing();
    let a = bundle(BundleVersion::Canonical, &[(1, slot("Nier", 50))]);
    let mut b = bundle(BundleVersion::Canonical, &[(1, slot("Nier", 75_000))]);
    b.header_mut().set_ending("B", true).expect("ending");

    let report = diff_bundles(&a, &b, &DiffOptions::default()).expect("diff");
    assert_eq!(
        report.changed_paths(),
        ["header.endings", "header.checksum", "slots.1.money", "slots.1.checksum"]
    );

    let lines = report.lines();
    assert_eq!(lines[0], "--- GAMEDATA (Canonical, 7 slots)");
    assert_eq!(lines[1], "+++ GAMEDATA (Canonical, 7 slots)");
    assert_eq!(lines[2], "--- header");
    assert_eq!(lines.iter().filter(|l| l.starts_with("--- ")).count(), 3);
    assert!(lines.iter().any(|l| l == "-    \"B\": false,"));
    assert!(lines.iter().any(|l| l == "+    \"B\": true,"));

    let money_only = DiffOptions {
        keys: Some(vec!["money".to_string()]),
        ..DiffOptions::default()
    };
    let report = diff_bundles(&a, &b, &money_only).expect("diff");
    assert_eq!(report.changed_paths(), ["slots.1.money"]);

    let header_only = DiffOptions {
        keys: Some(vec!["header".to_string()]),
        ..DiffOptions::default()
    };
    let report = diff_bundles(&a, &b, &header_only).expect("diff");
    assert_eq!(report.changed_paths(), ["header.endings", "header.checksum"]);
}

#[test]
fn identical_bundles_render_nothing() {
    let a = bundle(BundleVersion::Legacy, &[(0, slot("Nier", 50))]);
    let report = diff_bundles(&a, &a.clone(), &DiffOptions::default()).expect("diff");
    assert!(report.is_empty());
    assert_eq!(report.to_string(), "");
}

#[test]
fn records_of_different_layouts_are_rejected() {
    let bundle = bundle(BundleVersion::Canonical, &[]);
    let slot = slot("Nier", 1);
    let err = diff_records(bundle.header().record(), slot.record(), &DiffOptions::default())
        .expect_err("different layouts");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn flag_changes_name_the_flipped_ending() {
    let a = bundle(BundleVersion::Canonical, &[]);
    let mut b = a.clone();
    b.header_mut().set_ending("C", true).expect("ending");

    let endings = |bundle: &nier_core::SaveBundle| {
        bundle
            .header()
            .record()
            .get("endings")
            .and_then(Value::as_flags)
            .cloned()
            .expect("endings flags")
    };
    let changes = flag_changes(&endings(&a), &endings(&b));
    assert_eq!(
        changes,
        [FlagChange {
            bit: 2,
            name: Some("C"),
            from: false,
            to: true,
        }]
    );
}

#[test]
fn filler_fields_can_be_viewed() {
    let mut slot = slot("Nier", 50);
    slot.set("_unk4", Value::Bytes((1..=12).collect())).expect("filler");

    let view = view_field(slot.record(), "_unk4", &HexViewOptions::default()).expect("field");
    let expected = format!(
        "0x0: {:<89}  |  {:<40}\n",
        "01020304 05060708 090a0b0c", "............"
    );
    assert_eq!(view, expected);

    let all = view_unknowns(slot.record(), &HexViewOptions::default()).expect("view");
    assert!(all.contains(&format!("{bar}  _unk4  {bar}", bar = "=".repeat(30))));
    assert!(all.contains(&format!("{bar}  _unk15a1a1  {bar}", bar = "=".repeat(30))));
    assert!(view_field(slot.record(), "nope", &HexViewOptions::default()).is_err());
}
