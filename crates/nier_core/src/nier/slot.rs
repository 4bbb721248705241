use std::fmt;

use tracing::debug;

use crate::codec::datetime::Timestamp;
use crate::codec::quests::{QuestLog, QuestProgress};
use crate::error::{CodecError, Result};
use crate::nier::layouts::{SLOT, SLOT_OK_MARKER, SLOT_SIZE};
use crate::record::Record;
use crate::tables::map_zone;
use crate::value::Value;

/// One save slot: a decoded [`Record`] over the slot layout plus typed
/// accessors for the fields players actually look at.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSlot {
    record: Record,
}

impl SaveSlot {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            record: Record::decode(&SLOT, bytes)?,
        })
    }

    /// An all-zero slot. It decodes cleanly (its checksum is zero) but is not
    /// [`SaveSlot::is_ok`], which is how the game tells unused slots apart.
    pub fn empty() -> Result<Self> {
        Self::decode(&[0u8; SLOT_SIZE])
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.record.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        self.record.set(name, value)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.record.encode()
    }

    fn int(&self, name: &str) -> i64 {
        self.get(name).and_then(Value::as_i64).unwrap_or_default()
    }

    fn text(&self, name: &str) -> &str {
        self.get(name).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn is_ok(&self) -> bool {
        self.get("corruptness").and_then(Value::as_u64) == Some(SLOT_OK_MARKER)
    }

    pub fn name(&self) -> &str {
        self.text("name")
    }

    pub fn map(&self) -> &str {
        self.text("map")
    }

    pub fn character(&self) -> &str {
        self.text("character")
    }

    /// Level index as stored; the game shows `level() + 1`.
    pub fn level(&self) -> i64 {
        self.int("level")
    }

    pub fn xp(&self) -> i64 {
        self.int("xp")
    }

    pub fn money(&self) -> i64 {
        self.int("money")
    }

    pub fn health(&self) -> i64 {
        self.int("health")
    }

    pub fn total_play_time(&self) -> f64 {
        self.get("total_play_time")
            .and_then(Value::as_f64)
            .unwrap_or_default()
    }

    /// Play time as `HH:MM:SS`, hours unbounded.
    pub fn play_time(&self) -> String {
        let total = self.total_play_time().max(0.0) as u64;
        let (hours, rest) = (total / 3600, total % 3600);
        format!("{hours:02}:{:02}:{:02}", rest / 60, rest % 60)
    }

    /// Display name of the current map zone, or the raw map id if unknown.
    pub fn location(&self) -> &str {
        match map_zone(self.map()) {
            Some(zone) => zone,
            None => self.map(),
        }
    }

    /// The character name, with the player-chosen name in front when it is
    /// not already part of it.
    pub fn display_name(&self) -> String {
        let (name, character) = (self.name(), self.character());
        if character.to_lowercase().contains(&name.to_lowercase()) {
            character.to_string()
        } else {
            format!("{name} ({character})")
        }
    }

    pub fn known_words(&self) -> Vec<&'static str> {
        self.get("words")
            .and_then(Value::as_flags)
            .map(|words| words.enabled().collect())
            .unwrap_or_default()
    }

    pub fn save_time(&self) -> Timestamp {
        self.get("save_time")
            .and_then(Value::as_timestamp)
            .copied()
            .unwrap_or(Timestamp::Unset)
    }

    pub fn quests(&self) -> Option<&QuestLog> {
        self.get("quests").and_then(Value::as_quests)
    }

    pub fn quest(&self, name: &str) -> Option<QuestProgress> {
        self.quests()
            .and_then(|log| log.get(name))
            .or_else(|| self.get("quests_b")?.as_quests()?.get(name))
            .copied()
    }

    /// Set a quest's progress in whichever quest block holds it.
    pub fn update_quest(&mut self, name: &str, progress: QuestProgress) -> Result<()> {
        let block = ["quests", "quests_b"]
            .into_iter()
            .find(|block| {
                self.get(block)
                    .and_then(Value::as_quests)
                    .is_some_and(|log| log.get(name).is_some())
            })
            .ok_or_else(|| CodecError::invalid_mutation(name, "no such quest"))?;

        self.record.update(block, |value| {
            value
                .as_quests_mut()
                .ok_or_else(|| CodecError::invalid_mutation(block, "not a quest block"))?
                .set(name, progress)
        })?;
        debug!(quest = name, block, "quest updated");
        Ok(())
    }
}

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = match self.save_time() {
            Timestamp::At(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            _ => "N/A".to_string(),
        };
        write!(
            f,
            "[{time}][{}][{}, Lv.{} @ {}]",
            self.play_time(),
            self.display_name(),
            self.level() + 1,
            self.location()
        )
    }
}
