mod common;

use nier_core::codec::quests::QuestProgress;
use nier_core::core_api::{CoreErrorCode, Engine};
use nier_core::nier::{BundleVersion, PlotFilter};

use common::{at, bundle_bytes, played_slot};

#[test]
fn engine_defaults_to_the_canonical_layout() {
    let bytes = bundle_bytes(BundleVersion::Canonical, &[(0, played_slot("Nier", 50))]);
    let session = Engine::new().open_bytes(&bytes, None).expect("open");
    assert_eq!(session.version(), BundleVersion::Canonical);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.slots.len(), 7);
    assert_eq!(snapshot.endings, vec!["A".to_string()]);
    assert!(!snapshot.ok);

    let first = &snapshot.slots[0];
    assert!(first.ok);
    assert_eq!(first.level, 15);
    assert_eq!(first.play_time, "12:34:56");
    assert_eq!(first.location, "Seafront");
    assert_eq!(first.save_time, Some(at(2021, 5, 2, 21, 30, 5)));
}

#[test]
fn snapshot_serializes_as_plain_json() {
    common::init_tracing();
    let bytes = bundle_bytes(BundleVersion::Canonical, &[(2, played_slot("Nier", 50))]);
    let session = Engine::new().open_bytes(&bytes, None).expect("open");
    let json = serde_json::to_value(session.snapshot()).expect("serialize");

    assert_eq!(json["version"], "canonical");
    assert_eq!(json["slots"][2]["name"], "Nier");
    assert_eq!(json["slots"][2]["save_time"], "2021-05-02T21:30:05");
    assert!(json["slots"][0]["save_time"].is_null());

    let back: nier_core::core_api::Snapshot = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, session.snapshot());
}

#[test]
fn hinted_version_is_respected() {
    let bytes = bundle_bytes(BundleVersion::Legacy, &[]);
    let session = Engine::new()
        .open_bytes(&bytes, Some(BundleVersion::Legacy))
        .expect("open");
    assert_eq!(session.snapshot().slots.len(), 3);
}

#[test]
fn parse_failures_carry_a_code() {
    let err = Engine::new()
        .open_bytes([0u8; 16], None)
        .expect_err("too short");
    assert_eq!(err.code, CoreErrorCode::Parse);

    let mut bytes = bundle_bytes(BundleVersion::Canonical, &[]);
    bytes[0] ^= 1;
    let err = Engine::new()
        .open_bytes(&bytes, Some(BundleVersion::Canonical))
        .expect_err("checksum");
    assert_eq!(err.code, CoreErrorCode::Checksum);
    assert!(err.to_string().contains("header.checksum"));
}

#[test]
fn session_edits_round_trip_through_bytes() {
    let bytes = bundle_bytes(BundleVersion::Canonical, &[(0, played_slot("Nier", 50))]);
    let mut session = Engine::new().open_bytes(&bytes, None).expect("open");

    session.set_money(0, 75_000).expect("money");
    session.set_item_quantity(0, "Medicinal Herb", 99).expect("herbs");
    session
        .update_quest(
            0,
            "The Promised Gift",
            QuestProgress {
                started: true,
                stage: Some(5),
                ..Default::default()
            },
        )
        .expect("quest");
    let ripened = session
        .ripen_garden(0, 48, at(2021, 5, 3, 12, 0, 0))
        .expect("garden");
    assert_eq!(ripened, 1);
    session
        .set_water(0, 2, &PlotFilter::all())
        .expect("water");

    let out = session.to_bytes_modified().expect("emit");
    assert_ne!(out, session.to_bytes_unmodified());

    let reopened = Engine::new().open_bytes(&out, None).expect("reopen");
    assert_eq!(reopened.slot_summary(0).expect("summary").money, 75_000);
    assert!(reopened
        .inventory(0)
        .expect("inventory")
        .iter()
        .any(|item| item.name == "Medicinal Herb" && item.quantity == 99));
    let gift = reopened
        .quests(0)
        .expect("quests")
        .into_iter()
        .find(|q| q.name == "The Promised Gift")
        .expect("gift");
    assert_eq!(gift.stage, Some(5));

    let plot = &reopened.garden(0).expect("garden")[7];
    assert_eq!(plot.crop.as_deref(), Some("Tomato"));
    assert_eq!(plot.water, 2);
    assert_eq!(plot.planted, Some(at(2021, 5, 1, 12, 0, 0)));
}

#[test]
fn rejected_edits_leave_the_bundle_unmodified() {
    let bytes = bundle_bytes(BundleVersion::Canonical, &[(0, played_slot("Nier", 50))]);
    let mut session = Engine::new().open_bytes(&bytes, None).expect("open");

    let err = session
        .set_item_quantity(0, "World Map", 5)
        .expect_err("maps are unique");
    assert_eq!(err.code, CoreErrorCode::InvalidEdit);
    let err = session.set_money(9, 1).expect_err("no slot 9");
    assert_eq!(err.code, CoreErrorCode::OutOfRange);

    assert!(!session.bundle().is_modified());
    assert_eq!(session.to_bytes_modified().expect("emit"), bytes);
}

#[test]
fn slots_can_be_copied_and_cleared() {
    let bytes = bundle_bytes(BundleVersion::Canonical, &[(0, played_slot("Nier", 50))]);
    let mut session = Engine::new().open_bytes(&bytes, None).expect("open");
    session.copy_slot(0, 6).expect("copy");
    session.clear_slot(0).expect("clear");

    let snapshot = session.snapshot();
    assert!(!snapshot.slots[0].ok);
    assert_eq!(snapshot.slots[6].money, 50);

    let exported = session.export_slot(6).expect("export");
    let slot = Engine::new().open_slot(&exported).expect("open slot");
    assert_eq!(slot.name(), "Nier");
}
