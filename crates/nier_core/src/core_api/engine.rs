use chrono::NaiveDateTime;
use tracing::debug;

use crate::codec::quests::QuestProgress;
use crate::error::CodecError;
use crate::nier::{BundleVersion, PlantTime, PlotFilter, SaveBundle, SaveSlot};
use crate::value::Value;

use super::error::CoreError;
use super::types::{InventoryEntry, PlotEntry, QuestEntry, SlotSummary, Snapshot};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug)]
pub struct Session {
    bundle: SaveBundle,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Parse a `GAMEDATA` file. Without a hint the canonical seven-slot
    /// arrangement is tried first, then the legacy one.
    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        hint: Option<BundleVersion>,
    ) -> Result<Session, CoreError> {
        let bytes = bytes.as_ref();

        match hint {
            Some(version) => SaveBundle::parse(bytes, version)
                .map(Session::from_bundle)
                .map_err(|e| CoreError::from_codec(&format!("failed to parse as {version:?}"), e)),
            None => match SaveBundle::parse(bytes, BundleVersion::Canonical) {
                Ok(bundle) => Ok(Session::from_bundle(bundle)),
                Err(canonical) => SaveBundle::parse(bytes, BundleVersion::Legacy)
                    .map(Session::from_bundle)
                    .map_err(|legacy| {
                        CoreError::from_codec(
                            &format!("failed to parse input: Canonical: {canonical}; Legacy"),
                            legacy,
                        )
                    }),
            },
        }
    }

    /// Parse one exported slot.
    pub fn open_slot<B: AsRef<[u8]>>(&self, bytes: B) -> Result<SaveSlot, CoreError> {
        SaveSlot::decode(bytes.as_ref())
            .map_err(|e| CoreError::from_codec("failed to parse save slot", e))
    }
}

impl Session {
    fn from_bundle(bundle: SaveBundle) -> Self {
        debug!(version = ?bundle.version(), "opened session");
        Self { bundle }
    }

    pub fn version(&self) -> BundleVersion {
        self.bundle.version()
    }

    pub fn bundle(&self) -> &SaveBundle {
        &self.bundle
    }

    pub fn bundle_mut(&mut self) -> &mut SaveBundle {
        &mut self.bundle
    }

    pub fn snapshot(&self) -> Snapshot {
        let header = self.bundle.header();
        Snapshot {
            version: self.bundle.version(),
            endings: header.endings().into_iter().map(str::to_string).collect(),
            d_name: header.d_name().to_string(),
            ok: self.bundle.is_ok(),
            slots: self
                .bundle
                .slots()
                .enumerate()
                .map(|(index, slot)| summarize(index, slot))
                .collect(),
        }
    }

    pub fn slot_summary(&self, index: usize) -> Result<SlotSummary, CoreError> {
        Ok(summarize(index, self.slot(index)?))
    }

    pub fn quests(&self, index: usize) -> Result<Vec<QuestEntry>, CoreError> {
        let slot = self.slot(index)?;
        let mut out = Vec::new();
        for block in ["quests", "quests_b"] {
            let Some(log) = slot.get(block).and_then(Value::as_quests) else {
                continue;
            };
            out.extend(log.iter().map(|(name, progress)| QuestEntry {
                name: name.to_string(),
                started: progress.started,
                stage: progress.stage,
                partial_done: progress.partial_done,
                done: progress.done,
            }));
        }
        Ok(out)
    }

    pub fn inventory(&self, index: usize) -> Result<Vec<InventoryEntry>, CoreError> {
        Ok(self
            .slot(index)?
            .inventory()
            .into_iter()
            .map(|item| InventoryEntry {
                category: item.block.to_string(),
                name: item.name.to_string(),
                quantity: item.quantity,
                max: item.max,
            })
            .collect())
    }

    pub fn garden(&self, index: usize) -> Result<Vec<PlotEntry>, CoreError> {
        Ok(self
            .slot(index)?
            .garden()
            .into_iter()
            .map(|plot| PlotEntry {
                index: plot.index(),
                crop: plot.crop().map(str::to_string),
                fertilizer: plot.fertilizer.to_string(),
                water: plot.water.iter().filter(|&&w| w).count() as u8,
                direction: plot.direction.to_string(),
                planted: plot.time.datetime(),
            })
            .collect())
    }

    pub fn set_money(&mut self, index: usize, money: i64) -> Result<(), CoreError> {
        self.edit_slot(index, "money", |slot| slot.set("money", Value::Int(money)))
    }

    pub fn set_item_quantity(
        &mut self,
        index: usize,
        item: &str,
        quantity: u8,
    ) -> Result<(), CoreError> {
        self.edit_slot(index, "item quantity", |slot| slot.set_item_quantity(item, quantity))
    }

    pub fn update_quest(
        &mut self,
        index: usize,
        quest: &str,
        progress: QuestProgress,
    ) -> Result<(), CoreError> {
        self.edit_slot(index, "quest", |slot| slot.update_quest(quest, progress))
    }

    pub fn set_plant_times(
        &mut self,
        index: usize,
        when: PlantTime,
        filter: &PlotFilter,
    ) -> Result<usize, CoreError> {
        self.edit_slot(index, "plant times", |slot| slot.set_plant_times(when, filter))
    }

    /// Backdate every planted plot by `hours` from `now`.
    pub fn ripen_garden(
        &mut self,
        index: usize,
        hours: i64,
        now: NaiveDateTime,
    ) -> Result<usize, CoreError> {
        self.set_plant_times(index, PlantTime::HoursBefore { hours, now }, &PlotFilter::all())
    }

    pub fn set_fertilizer(
        &mut self,
        index: usize,
        fertilizer: &str,
        filter: &PlotFilter,
    ) -> Result<usize, CoreError> {
        self.edit_slot(index, "fertilizer", |slot| slot.set_fertilizer(fertilizer, filter))
    }

    pub fn set_water(
        &mut self,
        index: usize,
        times: u8,
        filter: &PlotFilter,
    ) -> Result<usize, CoreError> {
        self.edit_slot(index, "water", |slot| slot.set_water(times, filter))
    }

    /// Copy slot `from` over slot `to`.
    pub fn copy_slot(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        let slot = self.slot(from)?.clone();
        self.bundle
            .set_slot(to, slot)
            .map_err(|e| CoreError::from_codec("failed to copy slot", e))
    }

    pub fn import_slot(&mut self, index: usize, slot: SaveSlot) -> Result<(), CoreError> {
        self.bundle
            .set_slot(index, slot)
            .map_err(|e| CoreError::from_codec("failed to import slot", e))
    }

    pub fn clear_slot(&mut self, index: usize) -> Result<(), CoreError> {
        self.bundle
            .clear_slot(index)
            .map_err(|e| CoreError::from_codec("failed to clear slot", e))
    }

    pub fn export_slot(&self, index: usize) -> Result<Vec<u8>, CoreError> {
        self.bundle
            .export_slot(index)
            .map_err(|e| CoreError::from_codec("failed to export slot", e))
    }

    pub fn to_bytes_unmodified(&self) -> Vec<u8> {
        self.bundle.to_bytes_unmodified()
    }

    pub fn to_bytes_modified(&self) -> Result<Vec<u8>, CoreError> {
        self.bundle
            .to_bytes()
            .map_err(|e| CoreError::from_codec("failed to emit modified bytes", e))
    }

    fn slot(&self, index: usize) -> Result<&SaveSlot, CoreError> {
        self.bundle
            .slot(index)
            .map_err(|e| CoreError::from_codec("no such slot", e))
    }

    /// Edits run on a copy, so a rejected edit leaves the slot marked unmodified.
    fn edit_slot<T>(
        &mut self,
        index: usize,
        what: &str,
        edit: impl FnOnce(&mut SaveSlot) -> Result<T, CodecError>,
    ) -> Result<T, CoreError> {
        let mut slot = self.slot(index)?.clone();
        let out =
            edit(&mut slot).map_err(|e| CoreError::from_codec(&format!("failed to set {what}"), e))?;
        self.bundle
            .set_slot(index, slot)
            .map_err(|e| CoreError::from_codec("no such slot", e))?;
        Ok(out)
    }
}

fn summarize(index: usize, slot: &SaveSlot) -> SlotSummary {
    SlotSummary {
        index,
        ok: slot.is_ok(),
        name: slot.name().to_string(),
        character: slot.character().to_string(),
        level: slot.level() + 1,
        xp: slot.xp(),
        money: slot.money(),
        health: slot.health(),
        play_time: slot.play_time(),
        location: slot.location().to_string(),
        save_time: slot.save_time().datetime(),
    }
}
