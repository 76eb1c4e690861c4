//! Stat pipeline: turns a hero's base data and every modifier source into
//! effective combat stats.
//!
//! Layers run in a fixed order, each on the previous layer's output:
//! base + growth, awakening, equipment, global modifiers, skill tree, fatigue.

use super::attributes::{apply_bonuses, Stat, StatBlock};
use super::hero::Hero;
use super::skill_tree::{NoSkillBonuses, SkillTreeBonuses};
use crate::core::constants::{
    AWAKENING_STAT_BONUS, FATIGUE_STAT_MULTIPLIER, MIN_RARITY, RARITY_GROWTH_MULTIPLIERS,
};
use crate::items::types::Item;

/// Growth multiplier for a hero rarity. Out-of-range rarities are clamped.
pub fn rarity_growth_multiplier(rarity: u8) -> f64 {
    let index = rarity.max(MIN_RARITY) as usize - 1;
    RARITY_GROWTH_MULTIPLIERS[index.min(RARITY_GROWTH_MULTIPLIERS.len() - 1)]
}

pub struct StatPipeline {
    skill_bonuses: Box<dyn SkillTreeBonuses>,
}

impl Default for StatPipeline {
    fn default() -> Self {
        Self::new(NoSkillBonuses)
    }
}

impl StatPipeline {
    pub fn new(skill_bonuses: impl SkillTreeBonuses + 'static) -> Self {
        Self {
            skill_bonuses: Box::new(skill_bonuses),
        }
    }

    /// Layer 1: `floor(base + growth × (level − 1) × rarityMultiplier)`.
    pub fn base_stats(hero: &Hero) -> StatBlock {
        let multiplier = rarity_growth_multiplier(hero.rarity);
        let levels = hero.level.saturating_sub(1) as f64;
        let mut stats = StatBlock::default();
        for stat in Stat::all() {
            let base = hero.base_stats.get(stat) as f64;
            let growth = hero.growth_rates.get(stat) * levels * multiplier;
            stats.add_flat(stat, base + growth);
        }
        stats
    }

    /// Runs every layer without touching the hero.
    ///
    /// Fatigue counts only while it has not expired at `now_ms`.
    pub fn evaluate(&self, hero: &Hero, global_modifiers: &[Item], now_ms: u64) -> StatBlock {
        let mut stats = Self::base_stats(hero);

        if hero.awakenings > 0 {
            stats.scale_all(1.0 + AWAKENING_STAT_BONUS * hero.awakenings as f64);
        }

        for item in hero.equipment.iter_equipped() {
            apply_bonuses(&mut stats, &item.stat_bonuses, false);
        }

        for modifier in global_modifiers {
            for conditional in &modifier.conditional_effects {
                if conditional.applies_to(hero.rarity) {
                    apply_bonuses(&mut stats, &conditional.effect, true);
                }
            }
            apply_bonuses(&mut stats, &modifier.stat_bonuses, true);
        }

        self.skill_bonuses
            .apply(&hero.unlocked_skill_nodes, &mut stats);

        if hero.is_fatigued(now_ms) {
            stats.scale_all(FATIGUE_STAT_MULTIPLIER);
        }

        stats
    }

    /// Recomputes `hero.current_stats` and clamps current HP down to the new
    /// max. Expired fatigue is cleared. A hero at 0 HP stays at 0.
    pub fn compute(&self, hero: &mut Hero, global_modifiers: &[Item], now_ms: u64) -> StatBlock {
        let stats = self.evaluate(hero, global_modifiers, now_ms);

        if hero.fatigued && !hero.is_fatigued(now_ms) {
            hero.fatigued = false;
            hero.fatigue_end_time = None;
        }

        hero.current_stats = stats;
        hero.current_hp = hero.current_hp.min(stats.hp);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::{bonuses, GrowthRates};
    use crate::character::hero::{HeroRole, HeroTemplate};
    use crate::core::constants::FATIGUE_DURATION_MS;
    use crate::items::types::{ItemType, Rarity};
    use std::cell::Cell;
    use std::rc::Rc;

    fn template(rarity: u8) -> HeroTemplate {
        HeroTemplate {
            id: "test".to_string(),
            name: "Test".to_string(),
            rarity,
            role: HeroRole::Dps,
            base_stats: StatBlock::new(100, 10, 10, 10, 10),
            growth_rates: GrowthRates::new(10.0, 2.0, 1.0, 1.0, 1.0),
        }
    }

    fn item(item_type: ItemType, entries: &[(&str, f64)]) -> Item {
        let mut item = Item::new("Test", item_type, Rarity::Common, 1);
        for (key, value) in entries {
            item = item.with_bonus(key, *value);
        }
        item
    }

    #[test]
    fn test_rarity_multipliers() {
        assert_eq!(rarity_growth_multiplier(1), 0.8);
        assert_eq!(rarity_growth_multiplier(3), 1.0);
        assert_eq!(rarity_growth_multiplier(5), 1.5);
        assert_eq!(rarity_growth_multiplier(0), 0.8);
        assert_eq!(rarity_growth_multiplier(9), 1.5);
    }

    #[test]
    fn test_base_layer_uses_rarity_growth() {
        let mut hero = Hero::from_template(&template(3), 1);
        hero.level = 11;
        // 100 + 10*10*1.0, 10 + 2*10*1.0, 10 + 1*10*1.0
        assert_eq!(
            StatPipeline::base_stats(&hero),
            StatBlock::new(200, 30, 20, 20, 20)
        );

        let mut epic = Hero::from_template(&template(4), 1);
        epic.level = 11;
        assert_eq!(StatPipeline::base_stats(&epic).hp, 220);
    }

    #[test]
    fn test_awakening_multiplies_all() {
        let mut hero = Hero::from_template(&template(3), 1);
        hero.awakenings = 2;
        let stats = StatPipeline::default().compute(&mut hero, &[], 0);
        assert_eq!(stats, StatBlock::new(120, 12, 12, 12, 12));
    }

    #[test]
    fn test_equipment_flat_then_percent_and_all_stats_ignored() {
        let mut hero = Hero::from_template(&template(3), 1);
        hero.equipment
            .equip(item(
                ItemType::Weapon,
                &[("atk", 10.0), ("atkPercent", 0.5), ("allStatsPercent", 1.0)],
            ))
            .unwrap();
        let stats = StatPipeline::default().compute(&mut hero, &[], 0);
        assert_eq!(stats.atk, 30);
        assert_eq!(stats.def, 10);
        assert_eq!(stats.hp, 100);
    }

    #[test]
    fn test_global_modifier_all_stats_and_conditions() {
        let mut hero = Hero::from_template(&template(2), 1);
        let soulware = item(ItemType::SystemWide, &[("allStatsPercent", 0.5)])
            .with_conditional("heroRarity <= 3", bonuses([("def", 10.0)]))
            .with_conditional("heroRarity > 3", bonuses([("atk", 1000.0)]));
        let stats = StatPipeline::default().compute(&mut hero, &[soulware], 0);
        // def: (10 + 10) * 1.5; atk: 10 * 1.5, the > 3 branch never applies
        assert_eq!(stats.def, 30);
        assert_eq!(stats.atk, 15);
        assert_eq!(stats.hp, 150);
    }

    #[test]
    fn test_skill_strategy_always_invoked() {
        struct Counting(Rc<Cell<u32>>);
        impl SkillTreeBonuses for Counting {
            fn apply(&self, _unlocked: &[String], stats: &mut StatBlock) {
                self.0.set(self.0.get() + 1);
                stats.add_flat(Stat::Lck, 1.0);
            }
        }

        let calls = Rc::new(Cell::new(0));
        let pipeline = StatPipeline::new(Counting(calls.clone()));
        let mut hero = Hero::from_template(&template(3), 1);
        assert!(hero.unlocked_skill_nodes.is_empty());
        let stats = pipeline.compute(&mut hero, &[], 0);
        assert_eq!(calls.get(), 1);
        assert_eq!(stats.lck, 11);
    }

    #[test]
    fn test_fatigue_applies_then_clears() {
        let mut hero = Hero::from_template(&template(3), 1);
        hero.return_from_dispatch(false, 0);
        let pipeline = StatPipeline::default();

        let tired = pipeline.compute(&mut hero, &[], 1_000);
        assert_eq!(tired, StatBlock::new(80, 8, 8, 8, 8));
        assert!(hero.fatigued);

        let rested = pipeline.compute(&mut hero, &[], FATIGUE_DURATION_MS);
        assert_eq!(rested, StatBlock::new(100, 10, 10, 10, 10));
        assert!(!hero.fatigued);
        assert!(hero.fatigue_end_time.is_none());
    }

    #[test]
    fn test_hp_only_clamped_down() {
        let mut hero = Hero::from_template(&template(3), 1);
        let pipeline = StatPipeline::default();
        let armor = item(ItemType::Armor, &[("hp", 50.0)]);
        hero.equipment.equip(armor).unwrap();
        pipeline.compute(&mut hero, &[], 0);
        // Max went up, current HP did not
        assert_eq!(hero.current_stats.hp, 150);
        assert_eq!(hero.current_hp, 100);

        hero.equipment.weapon = None;
        hero.equipment.armor = None;
        pipeline.compute(&mut hero, &[], 0);
        assert_eq!(hero.current_hp, 100);

        hero.take_damage(1_000);
        pipeline.compute(&mut hero, &[], 0);
        assert_eq!(hero.current_hp, 0);
    }

    #[test]
    fn test_max_hp_drop_clamps_current() {
        let mut hero = Hero::from_template(&template(3), 1);
        let pipeline = StatPipeline::default();
        hero.equipment
            .equip(item(ItemType::Armor, &[("hp", 50.0)]))
            .unwrap();
        pipeline.compute(&mut hero, &[], 0);
        hero.full_heal();
        assert_eq!(hero.current_hp, 150);

        hero.equipment.unequip(crate::items::types::EquipmentSlot::Armor).unwrap();
        pipeline.compute(&mut hero, &[], 0);
        assert_eq!(hero.current_hp, 100);
    }

    #[test]
    fn test_layer_order_equipment_before_global() {
        let mut hero = Hero::from_template(&template(3), 1);
        hero.equipment
            .equip(item(ItemType::Weapon, &[("atk", 10.0)]))
            .unwrap();
        let global = item(ItemType::SystemWide, &[("atkPercent", 1.0)]);
        let stats = StatPipeline::default().compute(&mut hero, &[global], 0);
        assert_eq!(stats.atk, 40);
    }
}
