use super::constants::{MAX_SYSTEM_WIDE_SOULWARE, STARTING_SOUL_CORES};
use super::error::{DungeonError, DungeonResult};
use crate::character::hero::{Hero, HeroTemplate};
use crate::character::prestige::sigil_modifier;
use crate::items::inventory::Inventory;
use crate::items::types::Item;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Progress of the current dungeon push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonState {
    pub running: bool,
    /// Simulated ms spent on the current wave
    pub time_in_wave: u64,
    /// Only a prestige sends this back to 1
    pub wave: u32,
}

impl Default for DungeonState {
    fn default() -> Self {
        Self {
            running: false,
            time_in_wave: 0,
            wave: 1,
        }
    }
}

/// Lifetime counters. Survive prestige.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub total_enemies_killed: u64,
    pub total_bosses_killed: u64,
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
    pub total_items_found: u64,
    /// Drops rejected by a full inventory
    pub total_items_lost: u64,
    pub total_gold_earned: u64,
    pub total_party_wipes: u64,
    pub highest_wave: u32,
    pub highest_hero_level: u32,
}

impl Default for LifetimeStats {
    fn default() -> Self {
        Self {
            total_enemies_killed: 0,
            total_bosses_killed: 0,
            total_damage_dealt: 0,
            total_damage_taken: 0,
            total_items_found: 0,
            total_items_lost: 0,
            total_gold_earned: 0,
            total_party_wipes: 0,
            highest_wave: 1,
            highest_hero_level: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrestigeState {
    pub sigil_points: u32,
    pub total_prestiges: u32,
}

/// Account-wide state shared by the dungeon runner and the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub dungeon: DungeonState,
    pub gold: u64,
    /// Gold earned since the last prestige; drives sigil rewards
    pub lifetime_gold: u64,
    /// Account XP counter, separate from per-hero XP
    pub xp: u64,
    pub soul_cores: u64,
    /// Recycling currency
    pub fragments: u64,
    pub heroes: Vec<Hero>,
    pub inventory: Inventory,
    pub system_wide_soulware: Vec<Item>,
    pub stats: LifetimeStats,
    pub prestige: PrestigeState,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh account with the starter party.
    pub fn new() -> Self {
        let mut state = Self::empty();
        state.heroes = starter_party();
        state
    }

    /// Fresh account with no heroes.
    pub fn empty() -> Self {
        Self {
            dungeon: DungeonState::default(),
            gold: 0,
            lifetime_gold: 0,
            xp: 0,
            soul_cores: STARTING_SOUL_CORES,
            fragments: 0,
            heroes: Vec::new(),
            inventory: Inventory::default(),
            system_wide_soulware: Vec::new(),
            stats: LifetimeStats::default(),
            prestige: PrestigeState::default(),
        }
    }

    pub fn wave(&self) -> u32 {
        self.dungeon.wave
    }

    pub fn add_gold(&mut self, amount: u64) {
        self.gold += amount;
        self.lifetime_gold += amount;
        self.stats.total_gold_earned += amount;
    }

    pub fn spend_gold(&mut self, amount: u64) -> DungeonResult<()> {
        if self.gold < amount {
            return Err(DungeonError::NotEnoughGold {
                required: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    pub fn find_hero(&self, id: Uuid) -> DungeonResult<&Hero> {
        self.heroes
            .iter()
            .find(|hero| hero.id == id)
            .ok_or_else(|| DungeonError::HeroNotFound { id: id.to_string() })
    }

    pub fn find_hero_mut(&mut self, id: Uuid) -> DungeonResult<&mut Hero> {
        self.heroes
            .iter_mut()
            .find(|hero| hero.id == id)
            .ok_or_else(|| DungeonError::HeroNotFound { id: id.to_string() })
    }

    /// Stores a new drop and counts it as found. Rejected drops are not counted.
    pub fn store_item(&mut self, item: Item) -> DungeonResult<()> {
        self.inventory.add_item(item)?;
        self.stats.total_items_found += 1;
        Ok(())
    }

    /// Moves a Soulware item from the inventory into a system-wide slot.
    pub fn equip_soulware(&mut self, item_id: Uuid) -> DungeonResult<()> {
        let item = self
            .inventory
            .get(item_id)
            .ok_or_else(|| DungeonError::ItemNotFound {
                id: item_id.to_string(),
            })?;
        if !item.is_system_wide() {
            return Err(DungeonError::NotSystemWide);
        }
        if self.system_wide_soulware.len() >= MAX_SYSTEM_WIDE_SOULWARE {
            return Err(DungeonError::SoulwareSlotsFull);
        }
        let item = self.inventory.remove_item(item_id)?;
        self.system_wide_soulware.push(item);
        Ok(())
    }

    /// Moves a Soulware item back to the inventory. On a full inventory the
    /// item stays equipped.
    pub fn unequip_soulware(&mut self, item_id: Uuid) -> DungeonResult<()> {
        let index = self
            .system_wide_soulware
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| DungeonError::ItemNotFound {
                id: item_id.to_string(),
            })?;
        if self.inventory.is_full() {
            return Err(DungeonError::InventoryFull);
        }
        let item = self.system_wide_soulware.remove(index);
        self.inventory.add_item(item)
    }

    /// Equipped Soulware plus the sigil modifier, in application order.
    pub fn global_modifiers(&self) -> Vec<Item> {
        let mut modifiers = self.system_wide_soulware.clone();
        if let Some(sigils) = sigil_modifier(self.prestige.sigil_points) {
            modifiers.push(sigils);
        }
        modifiers
    }

    pub fn record_hero_level(&mut self, level: u32) {
        self.stats.highest_hero_level = self.stats.highest_hero_level.max(level);
    }
}

/// The three level-1 heroes every account starts with.
pub fn starter_party() -> Vec<Hero> {
    HeroTemplate::all()
        .iter()
        .map(|template| Hero::from_template(template, 1))
        .collect()
}
