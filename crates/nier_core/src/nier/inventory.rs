use tracing::debug;

use crate::error::{CodecError, Result};
use crate::nier::slot::SaveSlot;
use crate::value::Value;

/// Inventory blocks in slot order, with the most of any one item the game
/// lets you carry.
const BLOCKS: &[(&str, u8)] = &[
    ("recovery", 99),
    ("cultivation", 99),
    ("fishing", 99),
    ("raw_materials", 99),
    ("key_items", 1),
    ("documents", 1),
    ("maps", 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCount {
    pub block: &'static str,
    pub name: &'static str,
    pub quantity: u8,
    pub max: u8,
}

impl SaveSlot {
    /// Every named item with a non-zero count.
    pub fn inventory(&self) -> Vec<ItemCount> {
        let mut items = Vec::new();
        for &(block, max) in BLOCKS {
            let Some(record) = self.get(block).and_then(Value::as_record) else {
                continue;
            };
            for field in record.layout().fields().iter().filter(|f| !f.is_hidden()) {
                let quantity = record
                    .get(field.name())
                    .and_then(Value::as_u64)
                    .unwrap_or_default();
                if quantity == 0 {
                    continue;
                }
                items.push(ItemCount {
                    block,
                    name: field.name(),
                    quantity: quantity.min(u64::from(u8::MAX)) as u8,
                    max,
                });
            }
        }
        items
    }

    pub fn item_quantity(&self, name: &str) -> Option<u8> {
        let (block, _) = find_block(self, name)?;
        self.get(block)?
            .as_record()?
            .get(name)?
            .as_u64()
            .map(|q| q as u8)
    }

    /// Set how many of `name` the player carries. Stackable items hold up to
    /// 99; key items, documents and maps are either owned or not.
    pub fn set_item_quantity(&mut self, name: &str, quantity: u8) -> Result<()> {
        let (block, max) = find_block(self, name)
            .ok_or_else(|| CodecError::invalid_mutation(name, "no such item"))?;
        if quantity > max {
            return Err(CodecError::invalid_mutation(
                name,
                format!("quantity {quantity} is outside 0..={max}"),
            ));
        }
        self.record_mut().update(block, |value| {
            value
                .as_record_mut()
                .ok_or_else(|| CodecError::invalid_mutation(block, "not an item block"))?
                .set(name, Value::UInt(u64::from(quantity)))
        })?;
        debug!(item = name, block, quantity, "item quantity set");
        Ok(())
    }
}

fn find_block(slot: &SaveSlot, name: &str) -> Option<(&'static str, u8)> {
    if name.starts_with('_') {
        return None;
    }
    BLOCKS.iter().copied().find(|&(block, _)| {
        slot.get(block)
            .and_then(Value::as_record)
            .is_some_and(|record| record.layout().field(name).is_some())
    })
}
