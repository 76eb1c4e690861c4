//! Wave composition: enemy roster, boss waves, and dungeon events.

use super::types::{DungeonEvent, Enemy, EventEffect, EventKind};
use crate::core::constants::{
    BOSS_STAT_MULTIPLIER, BOSS_WAVE_INTERVAL, CURSED_ENEMY_COUNT_BONUS, CURSED_ENEMY_MULTIPLIER,
    ELITE_ENEMY_MULTIPLIER, ENEMY_BASE_ATK, ENEMY_BASE_DEF, ENEMY_BASE_HP,
    ENEMY_SCALING_PER_WAVE, LUCKY_BASE_XP, MAX_BASE_ENEMIES, REST_HEAL_FRACTION,
    TREASURE_BASE_GOLD, TREASURE_GOLD_PER_POWER, WAVES_PER_EXTRA_ENEMY,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

const ENEMY_NAMES: [&str; 8] = [
    "Corrupted Process",
    "Rogue Daemon",
    "Memory Leak",
    "Zombie Thread",
    "Glitch Sprite",
    "Null Pointer",
    "Spam Swarm",
    "Orphaned Socket",
];

const BOSS_NAMES: [&str; 4] = [
    "Kernel Panic",
    "Blue Screen Tyrant",
    "Rootkit Overlord",
    "Fork Bomb Hydra",
];

/// Enemies and event for one wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSpawn {
    pub wave: u32,
    pub is_boss_wave: bool,
    pub enemies: Vec<Enemy>,
    pub event: Option<DungeonEvent>,
}

pub fn is_boss_wave(wave: u32) -> bool {
    wave % BOSS_WAVE_INTERVAL == 0
}

/// `min(1 + floor(wave/5), 5)` before any event bonus.
pub fn base_enemy_count(wave: u32) -> u32 {
    (1 + wave / WAVES_PER_EXTRA_ENEMY).min(MAX_BASE_ENEMIES)
}

/// Stat factor for an enemy on `wave`.
pub fn enemy_stat_factor(wave: u32, is_boss: bool, enemy_multiplier: f64) -> f64 {
    let boss_multiplier = if is_boss { BOSS_STAT_MULTIPLIER } else { 1.0 };
    (1.0 + ENEMY_SCALING_PER_WAVE * wave as f64) * boss_multiplier * enemy_multiplier
}

/// Builds one enemy. Stats are floored.
pub fn build_enemy(name: &str, wave: u32, is_boss: bool, enemy_multiplier: f64) -> Enemy {
    let factor = enemy_stat_factor(wave, is_boss, enemy_multiplier);
    Enemy::new(
        name,
        (ENEMY_BASE_HP * factor).floor() as u32,
        (ENEMY_BASE_ATK * factor).floor() as u32,
        (ENEMY_BASE_DEF * factor).floor() as u32,
        is_boss,
    )
}

/// Standing modifiers an event puts on its wave.
pub fn event_for_kind(kind: EventKind) -> DungeonEvent {
    let (enemy_multiplier, enemy_count_bonus) = match kind {
        EventKind::Elite => (ELITE_ENEMY_MULTIPLIER, 0),
        EventKind::Cursed => (CURSED_ENEMY_MULTIPLIER, CURSED_ENEMY_COUNT_BONUS),
        EventKind::Treasure | EventKind::Rest | EventKind::Lucky => (1.0, 0),
    };
    DungeonEvent {
        kind,
        enemy_multiplier,
        enemy_count_bonus,
    }
}

/// One-time reward granted when the event's wave spawns.
pub fn event_effect(kind: EventKind, party_power: u32) -> Option<EventEffect> {
    let party_power = party_power as u64;
    match kind {
        EventKind::Treasure => Some(EventEffect::Gold(
            TREASURE_BASE_GOLD + TREASURE_GOLD_PER_POWER * party_power,
        )),
        EventKind::Lucky => Some(EventEffect::Xp(LUCKY_BASE_XP + party_power)),
        EventKind::Rest => Some(EventEffect::Heal(REST_HEAL_FRACTION)),
        EventKind::Elite | EventKind::Cursed => None,
    }
}

/// Picks an event kind from a roll in `[0, 100)` by cumulative weight.
pub fn event_kind_for_roll(roll: u32) -> EventKind {
    let mut cumulative = 0;
    for kind in EventKind::all() {
        cumulative += kind.weight();
        if roll < cumulative {
            return kind;
        }
    }
    EventKind::Treasure
}

/// Rolls whether this wave gets an event and which one.
pub fn roll_event(event_chance: f64, rng: &mut impl Rng) -> Option<DungeonEvent> {
    if rng.gen::<f64>() >= event_chance {
        return None;
    }
    Some(event_for_kind(event_kind_for_roll(rng.gen_range(0..100))))
}

/// Builds the roster for `wave`.
///
/// Boss waves get a single tripled enemy and never an event. Other waves may
/// roll an event whose modifiers shape this roster only.
pub fn spawn_wave(wave: u32, event_chance: f64, rng: &mut impl Rng) -> WaveSpawn {
    if is_boss_wave(wave) {
        let name = BOSS_NAMES[rng.gen_range(0..BOSS_NAMES.len())];
        return WaveSpawn {
            wave,
            is_boss_wave: true,
            enemies: vec![build_enemy(name, wave, true, 1.0)],
            event: None,
        };
    }

    let event = roll_event(event_chance, rng);
    let (multiplier, bonus) = event
        .map(|e| (e.enemy_multiplier, e.enemy_count_bonus))
        .unwrap_or((1.0, 0));
    let count = base_enemy_count(wave) + bonus;

    let enemies = (0..count)
        .map(|_| {
            let name = ENEMY_NAMES[rng.gen_range(0..ENEMY_NAMES.len())];
            build_enemy(name, wave, false, multiplier)
        })
        .collect();

    WaveSpawn {
        wave,
        is_boss_wave: false,
        enemies,
        event,
    }
}
