use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::nier::BundleVersion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotSummary {
    pub index: usize,
    pub ok: bool,
    pub name: String,
    pub character: String,
    /// Level as the game shows it, starting at 1.
    pub level: i64,
    pub xp: i64,
    pub money: i64,
    pub health: i64,
    pub play_time: String,
    pub location: String,
    pub save_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: BundleVersion,
    pub endings: Vec<String>,
    pub d_name: String,
    pub ok: bool,
    pub slots: Vec<SlotSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestEntry {
    pub name: String,
    pub started: bool,
    pub stage: Option<u64>,
    pub partial_done: Option<bool>,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryEntry {
    pub category: String,
    pub name: String,
    pub quantity: u8,
    pub max: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotEntry {
    pub index: usize,
    pub crop: Option<String>,
    pub fertilizer: String,
    /// 0, 1 or 2 waterings.
    pub water: u8,
    pub direction: String,
    pub planted: Option<NaiveDateTime>,
}
