//! Experience curve, level-up loop, and level milestone unlocks.

use super::derived_stats::StatPipeline;
use super::hero::Hero;
use crate::core::constants::{
    SKILL_POINTS_PER_LEVEL, XP_CURVE_EARLY_MAX_LEVEL, XP_CURVE_EARLY_PER_LEVEL,
    XP_CURVE_LATE_PER_LEVEL, XP_CURVE_MID_MAX_LEVEL, XP_CURVE_MID_PER_LEVEL,
};
use crate::items::types::Item;
use serde::{Deserialize, Serialize};

/// XP needed to reach `level` from the previous one.
///
/// - levels 1-20: `100 × level`
/// - levels 21-50: `150 × level`
/// - beyond: `floor(200 × level × (1 + level/100))`
pub fn required_xp(level: u32) -> u64 {
    if level <= XP_CURVE_EARLY_MAX_LEVEL {
        XP_CURVE_EARLY_PER_LEVEL * level as u64
    } else if level <= XP_CURVE_MID_MAX_LEVEL {
        XP_CURVE_MID_PER_LEVEL * level as u64
    } else {
        let level = level as f64;
        (XP_CURVE_LATE_PER_LEVEL * level * (1.0 + level / 100.0)).floor() as u64
    }
}

/// Feature unlocked on reaching a milestone level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LevelUnlock {
    PassiveSlot1,
    AbilitySlot2,
    DispatchTier2,
    PassiveSlot2,
    DispatchTier3,
    UltimateAbility,
    FinalPassive,
}

impl LevelUnlock {
    pub fn key(&self) -> &'static str {
        match self {
            LevelUnlock::PassiveSlot1 => "passiveSlot1",
            LevelUnlock::AbilitySlot2 => "abilitySlot2",
            LevelUnlock::DispatchTier2 => "dispatchTier2",
            LevelUnlock::PassiveSlot2 => "passiveSlot2",
            LevelUnlock::DispatchTier3 => "dispatchTier3",
            LevelUnlock::UltimateAbility => "ultimateAbility",
            LevelUnlock::FinalPassive => "finalPassive",
        }
    }
}

pub fn level_unlock(level: u32) -> Option<LevelUnlock> {
    match level {
        10 => Some(LevelUnlock::PassiveSlot1),
        20 => Some(LevelUnlock::AbilitySlot2),
        25 => Some(LevelUnlock::DispatchTier2),
        30 => Some(LevelUnlock::PassiveSlot2),
        50 => Some(LevelUnlock::DispatchTier3),
        75 => Some(LevelUnlock::UltimateAbility),
        100 => Some(LevelUnlock::FinalPassive),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpReport {
    pub levels_gained: u32,
    pub new_level: u32,
    pub unlocks: Vec<LevelUnlock>,
}

impl LevelUpReport {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Grants XP and applies every level-up it pays for in one call.
///
/// Each level grants a skill point and recomputes stats. XP left over once
/// the hero sits at max level is discarded.
pub fn add_xp(
    hero: &mut Hero,
    amount: u64,
    pipeline: &StatPipeline,
    global_modifiers: &[Item],
    now_ms: u64,
) -> LevelUpReport {
    hero.xp += amount;
    let mut report = LevelUpReport {
        levels_gained: 0,
        new_level: hero.level,
        unlocks: Vec::new(),
    };

    while hero.xp >= hero.xp_to_next_level && hero.level < hero.max_level() {
        hero.xp -= hero.xp_to_next_level;
        hero.level += 1;
        hero.xp_to_next_level = required_xp(hero.level + 1);
        hero.skill_points += SKILL_POINTS_PER_LEVEL;
        pipeline.compute(hero, global_modifiers, now_ms);

        report.levels_gained += 1;
        log::info!("{} reached level {}", hero.name, hero.level);
        if let Some(unlock) = level_unlock(hero.level) {
            log::info!("{} unlocked {}", hero.name, unlock.key());
            report.unlocks.push(unlock);
        }
    }

    if hero.level >= hero.max_level() {
        hero.xp = 0;
    }
    report.new_level = hero.level;
    report
}
