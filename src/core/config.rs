//! Runtime configuration for a dungeon run.

use super::constants::*;
use serde::{Deserialize, Serialize};

/// Timing thresholds and tunables for a [`DungeonRunner`](crate::dungeon::DungeonRunner).
///
/// Every field defaults to the matching constant, so a JSON config only needs
/// the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Period of the combat heartbeat
    pub tick_interval_ms: u64,
    /// Minimum time between two attacks of the same hero
    pub hero_attack_cooldown_ms: u64,
    /// Minimum time between two attacks of the same enemy
    pub enemy_attack_cooldown_ms: u64,
    /// Delay between a party wipe and the heal-and-respawn
    pub loss_recovery_delay_ms: u64,
    /// Chance that a non-boss wave rolls a dungeon event
    pub event_chance: f64,
    /// Drop chance on a normal wave
    pub loot_drop_chance: f64,
    /// Drop chance on a boss wave
    pub boss_loot_drop_chance: f64,
    /// Entries kept in the combat log ring
    pub combat_log_capacity: usize,
    /// Slots in the default inventory
    pub inventory_slots: usize,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            hero_attack_cooldown_ms: HERO_ATTACK_COOLDOWN_MS,
            enemy_attack_cooldown_ms: ENEMY_ATTACK_COOLDOWN_MS,
            loss_recovery_delay_ms: LOSS_RECOVERY_DELAY_MS,
            event_chance: DUNGEON_EVENT_CHANCE,
            loot_drop_chance: LOOT_DROP_CHANCE,
            boss_loot_drop_chance: BOSS_LOOT_DROP_CHANCE,
            combat_log_capacity: COMBAT_LOG_CAPACITY,
            inventory_slots: MAX_INVENTORY_SLOTS,
        }
    }
}

impl DungeonConfig {
    /// Parses a config from JSON. Missing keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Config with dungeon events disabled, used for deterministic waves.
    pub fn without_events() -> Self {
        Self {
            event_chance: 0.0,
            ..Default::default()
        }
    }

    pub fn drop_chance(&self, is_boss_wave: bool) -> f64 {
        if is_boss_wave {
            self.boss_loot_drop_chance
        } else {
            self.loot_drop_chance
        }
    }
}
