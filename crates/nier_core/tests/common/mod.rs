//! Synthetic saves. No real `GAMEDATA` ships with the repo, so fixtures are
//! built from an empty slot and encoded, which keeps every checksum valid.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use nier_core::Value;
use nier_core::codec::datetime::Timestamp;
use nier_core::codec::quests::QuestProgress;
use nier_core::nier::layouts::{GARDEN_COLUMNS, GARDEN_ROWS};
use nier_core::nier::{BundleVersion, SaveBundle, SaveSlot};

/// Route `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .expect("valid fixture time")
}

/// A slot with nothing planted. An all-zero slot has the first seed in every
/// plot, which is not what an unused garden looks like.
pub fn blank_slot() -> SaveSlot {
    let mut slot = SaveSlot::empty().expect("empty slot");
    for r in 0..GARDEN_ROWS {
        for c in 0..GARDEN_COLUMNS {
            slot.record_mut()
                .set_path(&format!("garden.{r}.{c}.seed"), Value::UInt(255))
                .expect("clear plot");
        }
    }
    slot
}

/// A mid-game slot with a little of everything filled in, including bytes in
/// undecoded filler.
pub fn played_slot(name: &str, money: i64) -> SaveSlot {
    let mut slot = blank_slot();
    let fields = [
        ("corruptness", Value::UInt(200)),
        ("name", Value::Str(name.to_string())),
        ("character", Value::Str("NieR (Old)".to_string())),
        ("map", Value::Str("B_SEASIDE_TOWN_011_D".to_string())),
        ("level", Value::Int(14)),
        ("xp", Value::Int(12_345)),
        ("money", Value::Int(money)),
        ("health", Value::Int(420)),
        ("total_play_time", Value::F64(45_296.25)),
        ("save_time", Value::DateTime(Timestamp::At(at(2021, 5, 2, 21, 30, 5)))),
        ("_unk4", Value::Bytes((1..=12).collect())),
        ("_unk18b1", Value::Bytes((0..199).map(|i| (i * 7) as u8).collect())),
    ];
    for (field, value) in fields {
        slot.set(field, value).expect(field);
    }

    slot.record_mut()
        .set_path("garden.1.2.seed", Value::Str("Tomato Seed".to_string()))
        .expect("plant");
    slot.record_mut()
        .set_path("garden.1.2.fertilizer", Value::Str("Bounty Fertilizer".to_string()))
        .expect("fertilize");
    slot.record_mut()
        .set_path("garden.1.2.time", Value::DateTime(Timestamp::At(at(2021, 5, 2, 9, 0, 0))))
        .expect("plant time");

    slot.update_quest(
        "Herbal Remedies",
        QuestProgress {
            started: true,
            done: true,
            ..Default::default()
        },
    )
    .expect("quest");
    slot.set_item_quantity("Medicinal Herb", 7).expect("herbs");
    slot.record_mut()
        .update("words", |words| {
            words.as_flags_mut().expect("flags").set("Pah", true)
        })
        .expect("word");
    slot
}

pub fn bundle_with(version: BundleVersion, slots: &[(usize, SaveSlot)]) -> SaveBundle {
    let mut bundle = SaveBundle::empty(version).expect("empty bundle");
    bundle.header_mut().set_ending("A", true).expect("ending");
    for (index, slot) in slots {
        bundle.set_slot(*index, slot.clone()).expect("slot");
    }
    bundle
}

/// Encoded bytes of a bundle holding the given slots.
pub fn bundle_bytes(version: BundleVersion, slots: &[(usize, SaveSlot)]) -> Vec<u8> {
    bundle_with(version, slots).to_bytes().expect("encode bundle")
}
