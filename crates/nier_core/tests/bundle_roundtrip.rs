mod common;

use nier_core::layout::SectionId;
use nier_core::nier::{BundleVersion, SaveBundle, SaveSlot};
use nier_core::{ErrorKind, Value};

use common::{bundle_bytes, played_slot};

#[test]
fn canonical_bundle_round_trips_byte_for_byte() {
    let bytes = bundle_bytes(
        BundleVersion::Canonical,
        &[(0, played_slot("Nier", 1_000)), (6, played_slot("Nier", 77))],
    );
    let bundle = SaveBundle::parse(&bytes, BundleVersion::Canonical).expect("parse");
    bundle.layout().validate().expect("layout");
    assert_eq!(bundle.header().endings(), vec!["A"]);
    assert_eq!(bundle.slot(0).expect("slot 0").money(), 1_000);
    assert_eq!(bundle.slot(6).expect("slot 6").money(), 77);

    assert_eq!(bundle.to_bytes_unmodified(), bytes);
    assert_eq!(bundle.to_bytes().expect("encode"), bytes);
}

#[test]
fn legacy_bundle_keeps_its_tail() {
    let mut bytes = bundle_bytes(BundleVersion::Legacy, &[(2, played_slot("Nier", 5))]);
    let tail = BundleVersion::Legacy
        .file_layout()
        .section(SectionId::Tail)
        .expect("tail")
        .range;
    bytes[tail.start + 3] = 0x5a;

    let bundle = SaveBundle::parse(&bytes, BundleVersion::Legacy).expect("parse");
    assert_eq!(bundle.slot_count(), 3);
    assert_eq!(bundle.section_bytes(SectionId::Tail).expect("tail")[3], 0x5a);
    assert_eq!(bundle.to_bytes().expect("encode"), bytes);
}

#[test]
fn untouched_filler_survives_an_edit_elsewhere() {
    let bytes = bundle_bytes(BundleVersion::Canonical, &[(1, played_slot("Nier", 10))]);
    let mut bundle = SaveBundle::parse(&bytes, BundleVersion::Canonical).expect("parse");
    bundle
        .slot_mut(1)
        .expect("slot")
        .set("money", Value::Int(99_999))
        .expect("money");
    let out = bundle.to_bytes().expect("encode");

    let reread = SaveBundle::parse(&out, BundleVersion::Canonical).expect("re-parse");
    let slot = reread.slot(1).expect("slot");
    assert_eq!(slot.money(), 99_999);
    assert_eq!(
        slot.record().raw("_unk18b1").expect("filler"),
        bundle.slot(1).expect("slot").record().raw("_unk18b1").expect("filler")
    );
    assert_eq!(slot.record().raw("_unk4").expect("filler"), &(1..=12).collect::<Vec<u8>>()[..]);
}

#[test]
fn exported_slot_imports_into_another_bundle() {
    let source = common::bundle_with(BundleVersion::Canonical, &[(0, played_slot("Nier", 321))]);
    let exported = source.export_slot(0).expect("export");

    let mut target = SaveBundle::empty(BundleVersion::Legacy).expect("empty");
    target
        .set_slot(2, SaveSlot::decode(&exported).expect("decode"))
        .expect("import");
    let out = target.to_bytes().expect("encode");
    let reread = SaveBundle::parse(&out, BundleVersion::Legacy).expect("parse");
    assert_eq!(reread.slot(2).expect("slot").money(), 321);
    assert_eq!(reread.export_slot(2).expect("export"), exported);
}

#[test]
fn corrupt_header_is_reported_with_location() {
    let mut bytes = bundle_bytes(BundleVersion::Canonical, &[]);
    bytes[100] ^= 0xff;
    let err = SaveBundle::parse(&bytes, BundleVersion::Canonical).expect_err("corrupt");
    assert_eq!(err.kind(), ErrorKind::ChecksumMismatch);
    assert_eq!(err.field(), Some("header.checksum"));
    assert_eq!(err.offset(), Some(33_108));
}

#[test]
fn bundle_display_lists_every_slot() {
    let bundle = common::bundle_with(BundleVersion::Canonical, &[(0, played_slot("Nier", 1))]);
    let text = bundle.to_string();
    assert_eq!(text.lines().count(), 8);
    assert!(text.contains("#1 [2021-05-02 21:30:05][12:34:56][NieR (Old), Lv.15 @ Seafront]"));
}
