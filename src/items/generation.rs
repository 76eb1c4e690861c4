use super::types::{Item, ItemType, Rarity};
use crate::character::attributes::Stat;
use crate::core::constants::{
    ACCESSORY_LCK_FACTOR, ACCESSORY_SPD_FACTOR, ARMOR_HP_PER_BASE, BOSS_LOOT_DROP_CHANCE,
    BOSS_RARITY_ROLL_FACTOR, ITEM_BASE_STAT, ITEM_STAT_PER_RARITY, ITEM_STAT_PER_WAVE,
    LOOT_DROP_CHANCE,
};
use rand::Rng;
use uuid::Builder;

/// Rarity weights out of 100, rarest first.
///
/// The roll is matched from the top of this table, so shrinking the roll
/// (boss waves) moves results toward the rare end.
pub const RARITY_WEIGHTS: [(Rarity, f64); 5] = [
    (Rarity::Legendary, 1.0),
    (Rarity::Epic, 4.0),
    (Rarity::Rare, 15.0),
    (Rarity::Uncommon, 30.0),
    (Rarity::Common, 50.0),
];

const WEAPON_NAMES: [&str; 6] = ["Blade", "Axe", "Spear", "Mace", "Dagger", "Staff"];
const ARMOR_NAMES: [&str; 5] = ["Mail", "Plate", "Robe", "Jerkin", "Aegis"];
const ACCESSORY_NAMES: [&str; 5] = ["Ring", "Amulet", "Charm", "Talisman", "Sigil"];

pub fn drop_chance(is_boss_wave: bool) -> f64 {
    if is_boss_wave {
        BOSS_LOOT_DROP_CHANCE
    } else {
        LOOT_DROP_CHANCE
    }
}

/// Maps a roll in `[0, 100)` onto a rarity. Rolls past the table land on Common.
pub fn rarity_for_roll(roll: f64) -> Rarity {
    let mut cumulative = 0.0;
    for (rarity, weight) in RARITY_WEIGHTS {
        cumulative += weight;
        if roll < cumulative {
            return rarity;
        }
    }
    Rarity::Common
}

pub fn roll_rarity(is_boss_wave: bool, rng: &mut impl Rng) -> Rarity {
    let mut roll = rng.gen::<f64>() * 100.0;
    if is_boss_wave {
        roll *= BOSS_RARITY_ROLL_FACTOR;
    }
    rarity_for_roll(roll)
}

/// Weapon, armor or accessory with equal odds. Soulware never drops.
pub fn roll_item_type(rng: &mut impl Rng) -> ItemType {
    match rng.gen_range(0..3) {
        0 => ItemType::Weapon,
        1 => ItemType::Armor,
        _ => ItemType::Accessory,
    }
}

/// `floor(5 × rarity×0.5 × (1 + wave×0.1))`
pub fn item_stat_base(wave: u32, rarity: Rarity) -> u32 {
    let rarity_factor = rarity.tier() as f64 * ITEM_STAT_PER_RARITY;
    let wave_factor = 1.0 + wave as f64 * ITEM_STAT_PER_WAVE;
    (ITEM_BASE_STAT * rarity_factor * wave_factor).floor() as u32
}

/// Builds an item of a known rarity and type. Name and id still come from `rng`.
pub fn build_item(wave: u32, rarity: Rarity, item_type: ItemType, rng: &mut impl Rng) -> Item {
    let base = item_stat_base(wave, rarity);
    let pool: &[&str] = match item_type {
        ItemType::Weapon => &WEAPON_NAMES,
        ItemType::Armor => &ARMOR_NAMES,
        ItemType::Accessory | ItemType::SystemWide => &ACCESSORY_NAMES,
    };
    let base_name = pool[rng.gen_range(0..pool.len())];

    let mut item = Item::new(
        format!("{} {}", rarity.name(), base_name),
        item_type,
        rarity,
        wave,
    );
    item.id = Builder::from_random_bytes(rng.gen()).into_uuid();

    match item_type {
        ItemType::Weapon => {
            item = item.with_bonus(Stat::Atk.key(), base as f64);
        }
        ItemType::Armor => {
            item = item
                .with_bonus(Stat::Hp.key(), (base * ARMOR_HP_PER_BASE) as f64)
                .with_bonus(Stat::Def.key(), base as f64);
        }
        ItemType::Accessory | ItemType::SystemWide => {
            let spd = (base as f64 * ACCESSORY_SPD_FACTOR).floor();
            let lck = (base as f64 * ACCESSORY_LCK_FACTOR).floor();
            item = item
                .with_bonus(Stat::Spd.key(), spd)
                .with_bonus(Stat::Lck.key(), lck);
        }
    }
    item
}

/// Rolls a full drop for `wave`. Deterministic for a given RNG state.
pub fn generate_item(wave: u32, is_boss_wave: bool, rng: &mut impl Rng) -> Item {
    let rarity = roll_rarity(is_boss_wave, rng);
    let item_type = roll_item_type(rng);
    build_item(wave, rarity, item_type, rng)
}

/// Rolls against `chance` first, then generates the item on success.
pub fn try_drop_item(
    wave: u32,
    is_boss_wave: bool,
    chance: f64,
    rng: &mut impl Rng,
) -> Option<Item> {
    if rng.gen::<f64>() >= chance {
        return None;
    }
    Some(generate_item(wave, is_boss_wave, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rarity_for_roll_boundaries() {
        assert_eq!(rarity_for_roll(0.0), Rarity::Legendary);
        assert_eq!(rarity_for_roll(0.99), Rarity::Legendary);
        assert_eq!(rarity_for_roll(1.0), Rarity::Epic);
        assert_eq!(rarity_for_roll(4.99), Rarity::Epic);
        assert_eq!(rarity_for_roll(5.0), Rarity::Rare);
        assert_eq!(rarity_for_roll(19.99), Rarity::Rare);
        assert_eq!(rarity_for_roll(20.0), Rarity::Uncommon);
        assert_eq!(rarity_for_roll(49.99), Rarity::Uncommon);
        assert_eq!(rarity_for_roll(50.0), Rarity::Common);
        assert_eq!(rarity_for_roll(99.99), Rarity::Common);
        // Out of range falls back to Common
        assert_eq!(rarity_for_roll(100.0), Rarity::Common);
    }

    #[test]
    fn test_item_stat_base() {
        assert_eq!(item_stat_base(0, Rarity::Uncommon), 5);
        assert_eq!(item_stat_base(1, Rarity::Common), 2);
        assert_eq!(item_stat_base(10, Rarity::Epic), 20);
        assert_eq!(item_stat_base(10, Rarity::Legendary), 25);
    }

    #[test]
    fn test_build_weapon_stats() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let item = build_item(10, Rarity::Epic, ItemType::Weapon, &mut rng);
        assert_eq!(item.flat_bonus(Stat::Atk), 20.0);
        assert_eq!(item.stat_bonuses.len(), 1);
        assert_eq!(item.level, 10);
        assert!(item.name.starts_with("Epic "));
    }

    #[test]
    fn test_build_armor_stats() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let item = build_item(10, Rarity::Epic, ItemType::Armor, &mut rng);
        assert_eq!(item.flat_bonus(Stat::Hp), 60.0);
        assert_eq!(item.flat_bonus(Stat::Def), 20.0);
        assert_eq!(item.flat_bonus(Stat::Atk), 0.0);
    }

    #[test]
    fn test_build_accessory_stats() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let item = build_item(10, Rarity::Epic, ItemType::Accessory, &mut rng);
        assert_eq!(item.flat_bonus(Stat::Spd), 10.0);
        assert_eq!(item.flat_bonus(Stat::Lck), 6.0);
    }

    #[test]
    fn test_generation_is_pure_given_rng() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for wave in 1..20 {
            assert_eq!(
                generate_item(wave, wave % 10 == 0, &mut a),
                generate_item(wave, wave % 10 == 0, &mut b)
            );
        }
    }

    #[test]
    fn test_generated_items_are_never_soulware() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let item = generate_item(5, false, &mut rng);
            assert!(!item.is_system_wide());
            assert!(item.item_type.slot().is_some());
        }
    }

    #[test]
    fn test_boss_roll_favours_rarer_items() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let n = 20_000;
        let normal_rare_plus = (0..n)
            .filter(|_| roll_rarity(false, &mut rng) >= Rarity::Rare)
            .count();
        let boss_rare_plus = (0..n)
            .filter(|_| roll_rarity(true, &mut rng) >= Rarity::Rare)
            .count();
        assert!(
            boss_rare_plus > normal_rare_plus,
            "boss {boss_rare_plus} should beat normal {normal_rare_plus}"
        );
        // Halved roll never lands in the Common band
        let mut rng = ChaCha8Rng::seed_from_u64(100);
        assert!((0..n).all(|_| roll_rarity(true, &mut rng) != Rarity::Common));
    }

    #[test]
    fn test_drop_chance() {
        assert_eq!(drop_chance(true), 1.0);
        assert!((drop_chance(false) - 0.3).abs() < f64::EPSILON);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(try_drop_item(10, true, 1.0, &mut rng).is_some());
            assert!(try_drop_item(3, false, 0.0, &mut rng).is_none());
        }
    }
}
