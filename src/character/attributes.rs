use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NUM_STATS: usize = 5;

/// Key that scales every stat at once. Only honored on global modifiers.
pub const ALL_STATS_PERCENT_KEY: &str = "allStatsPercent";
const PERCENT_SUFFIX: &str = "Percent";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spd,
    Lck,
}

impl Stat {
    pub fn all() -> [Stat; NUM_STATS] {
        [Stat::Hp, Stat::Atk, Stat::Def, Stat::Spd, Stat::Lck]
    }

    /// Key used in bonus maps (`"atk"`, `"atkPercent"` ...).
    pub fn key(&self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spd => "spd",
            Stat::Lck => "lck",
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Atk => "ATK",
            Stat::Def => "DEF",
            Stat::Spd => "SPD",
            Stat::Lck => "LCK",
        }
    }

    pub fn from_key(key: &str) -> Option<Stat> {
        Stat::all().into_iter().find(|stat| stat.key() == key)
    }
}

/// Integer combat stats of a hero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatBlock {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spd: u32,
    pub lck: u32,
}

impl StatBlock {
    pub fn new(hp: u32, atk: u32, def: u32, spd: u32, lck: u32) -> Self {
        Self {
            hp,
            atk,
            def,
            spd,
            lck,
        }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spd => self.spd,
            Stat::Lck => self.lck,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Hp => self.hp = value,
            Stat::Atk => self.atk = value,
            Stat::Def => self.def = value,
            Stat::Spd => self.spd = value,
            Stat::Lck => self.lck = value,
        }
    }

    /// Adds a flat amount to one stat, flooring and clamping at 0.
    pub fn add_flat(&mut self, stat: Stat, amount: f64) {
        let value = (self.get(stat) as f64 + amount).floor();
        self.set(stat, to_stat_value(value));
    }

    /// Multiplies one stat by `factor`, flooring the result.
    pub fn scale(&mut self, stat: Stat, factor: f64) {
        let value = (self.get(stat) as f64 * factor).floor();
        self.set(stat, to_stat_value(value));
    }

    /// Multiplies every stat by `factor`, flooring each result.
    pub fn scale_all(&mut self, factor: f64) {
        for stat in Stat::all() {
            self.scale(stat, factor);
        }
    }

    pub fn total(&self) -> u32 {
        Stat::all().iter().map(|&stat| self.get(stat)).sum()
    }
}

fn to_stat_value(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value as u32
    }
}

/// Per-level growth of each stat (fractional, floored after rarity scaling).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GrowthRates {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub spd: f64,
    pub lck: f64,
}

impl GrowthRates {
    pub fn new(hp: f64, atk: f64, def: f64, spd: f64, lck: f64) -> Self {
        Self {
            hp,
            atk,
            def,
            spd,
            lck,
        }
    }

    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spd => self.spd,
            Stat::Lck => self.lck,
        }
    }
}

/// Data-driven stat bonuses, e.g. `{"atk": 12, "hpPercent": 0.1}`.
///
/// A `BTreeMap` keeps iteration order stable, so two items with the same
/// bonuses always produce the same stats.
pub type StatBonuses = BTreeMap<String, f64>;

/// Meaning of one key in a [`StatBonuses`] map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusKey {
    Flat(Stat),
    Percent(Stat),
    AllStatsPercent,
}

impl BonusKey {
    /// Parses a bonus key. Unknown stats yield None.
    pub fn parse(key: &str) -> Option<BonusKey> {
        if key == ALL_STATS_PERCENT_KEY {
            return Some(BonusKey::AllStatsPercent);
        }
        match key.strip_suffix(PERCENT_SUFFIX) {
            Some(stat_key) => Stat::from_key(stat_key).map(BonusKey::Percent),
            None => Stat::from_key(key).map(BonusKey::Flat),
        }
    }
}

/// Applies a bonus map onto `stats`: flat bonuses first, then per-stat
/// percentages, then `allStatsPercent` when `allow_all_stats` is set.
/// Keys naming no known stat are skipped.
pub fn apply_bonuses(stats: &mut StatBlock, bonuses: &StatBonuses, allow_all_stats: bool) {
    let parsed: Vec<(BonusKey, f64)> = bonuses
        .iter()
        .filter_map(|(key, &value)| match BonusKey::parse(key) {
            Some(parsed) => Some((parsed, value)),
            None => {
                log::debug!("ignoring unknown stat bonus key {key:?}");
                None
            }
        })
        .collect();

    for (key, value) in &parsed {
        if let BonusKey::Flat(stat) = key {
            stats.add_flat(*stat, *value);
        }
    }
    for (key, value) in &parsed {
        if let BonusKey::Percent(stat) = key {
            stats.scale(*stat, 1.0 + value);
        }
    }
    if allow_all_stats {
        for (key, value) in &parsed {
            if *key == BonusKey::AllStatsPercent {
                stats.scale_all(1.0 + value);
            }
        }
    }
}

/// Builds a bonus map from `(key, value)` pairs.
pub fn bonuses<const N: usize>(entries: [(&str, f64); N]) -> StatBonuses {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_keys_round_trip() {
        for stat in Stat::all() {
            assert_eq!(Stat::from_key(stat.key()), Some(stat));
        }
        assert_eq!(Stat::from_key("mana"), None);
    }

    #[test]
    fn test_bonus_key_parse() {
        assert_eq!(BonusKey::parse("atk"), Some(BonusKey::Flat(Stat::Atk)));
        assert_eq!(
            BonusKey::parse("hpPercent"),
            Some(BonusKey::Percent(Stat::Hp))
        );
        assert_eq!(
            BonusKey::parse("allStatsPercent"),
            Some(BonusKey::AllStatsPercent)
        );
        assert_eq!(BonusKey::parse("critChance"), None);
        assert_eq!(BonusKey::parse("manaPercent"), None);
        assert_eq!(BonusKey::parse("Percent"), None);
    }

    #[test]
    fn test_apply_flat_before_percent() {
        let mut stats = StatBlock::new(100, 10, 0, 0, 0);
        apply_bonuses(
            &mut stats,
            &bonuses([("atkPercent", 0.5), ("atk", 10.0)]),
            false,
        );
        // (10 + 10) * 1.5, not 10 * 1.5 + 10
        assert_eq!(stats.atk, 30);
        assert_eq!(stats.hp, 100);
    }

    #[test]
    fn test_all_stats_percent_only_when_allowed() {
        let mut item_stats = StatBlock::new(100, 10, 10, 10, 10);
        apply_bonuses(&mut item_stats, &bonuses([("allStatsPercent", 0.1)]), false);
        assert_eq!(item_stats, StatBlock::new(100, 10, 10, 10, 10));

        let mut global_stats = StatBlock::new(100, 10, 10, 10, 10);
        apply_bonuses(&mut global_stats, &bonuses([("allStatsPercent", 0.1)]), true);
        assert_eq!(global_stats, StatBlock::new(110, 11, 11, 11, 11));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut stats = StatBlock::new(50, 5, 5, 5, 5);
        apply_bonuses(
            &mut stats,
            &bonuses([("critChance", 0.2), ("mana", 40.0), ("manaPercent", 1.0)]),
            true,
        );
        assert_eq!(stats, StatBlock::new(50, 5, 5, 5, 5));
    }

    #[test]
    fn test_negative_bonus_clamps_at_zero() {
        let mut stats = StatBlock::new(50, 5, 5, 5, 5);
        stats.add_flat(Stat::Def, -20.0);
        assert_eq!(stats.def, 0);
        stats.scale(Stat::Atk, -1.0);
        assert_eq!(stats.atk, 0);
    }

    #[test]
    fn test_scale_all_floors() {
        let mut stats = StatBlock::new(15, 7, 3, 1, 9);
        stats.scale_all(1.1);
        assert_eq!(stats, StatBlock::new(16, 7, 3, 1, 9));
    }
}
