use super::types::Item;
use crate::core::constants::{MAX_INVENTORY_SLOTS, RECYCLE_GOLD_PER_LEVEL};
use crate::core::error::{DungeonError, DungeonResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bounded bag of unequipped items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    max_slots: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(MAX_INVENTORY_SLOTS)
    }
}

impl Inventory {
    pub fn with_capacity(max_slots: usize) -> Self {
        Self {
            items: Vec::new(),
            max_slots,
        }
    }

    /// Stores an item. A full inventory rejects it and the item is dropped.
    pub fn add_item(&mut self, item: Item) -> DungeonResult<()> {
        if self.is_full() {
            return Err(DungeonError::InventoryFull);
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove_item(&mut self, id: Uuid) -> DungeonResult<Item> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| DungeonError::ItemNotFound { id: id.to_string() })?;
        Ok(self.items.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_slots
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    /// Changes capacity. Items past a lowered cap are kept; the bag just
    /// reports full until enough are removed.
    pub fn set_max_slots(&mut self, max_slots: usize) {
        self.max_slots = max_slots;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// What recycling an item yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecycleValue {
    pub gold: u64,
    pub fragments: u64,
}

/// Gold scales with item level and rarity; fragments with rarity alone.
pub fn recycle_value(item: &Item) -> RecycleValue {
    let rarity = item.rarity.tier() as u64;
    let level = item.level.max(1) as u64;
    RecycleValue {
        gold: (level * RECYCLE_GOLD_PER_LEVEL * rarity).max(1),
        fragments: rarity.max(1),
    }
}
