#![allow(dead_code)]

use nier_core::Value;
use nier_core::nier::{BundleVersion, SaveBundle, SaveSlot};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An otherwise empty slot carrying a name, some money and a valid
/// integrity marker.
pub fn slot(name: &str, money: i64) -> SaveSlot {
    let mut slot = SaveSlot::empty().expect("empty slot");
    slot.set("corruptness", Value::UInt(200)).expect("marker");
    slot.set("name", Value::Str(name.to_string())).expect("name");
    slot.set("money", Value::Int(money)).expect("money");
    slot
}

pub fn bundle(version: BundleVersion, slots: &[(usize, SaveSlot)]) -> SaveBundle {
    let mut bundle = SaveBundle::empty(version).expect("empty bundle");
    bundle.header_mut().set_ending("A", true).expect("ending");
    for (index, slot) in slots {
        bundle.set_slot(*index, slot.clone()).expect("slot");
    }
    bundle
}

/// `len` bytes counting up from zero, wrapping at 256.
pub fn ramp(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}
