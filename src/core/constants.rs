// Tick and timing (simulation milliseconds)
pub const TICK_INTERVAL_MS: u64 = 500;
pub const HERO_ATTACK_COOLDOWN_MS: u64 = 2000;
pub const ENEMY_ATTACK_COOLDOWN_MS: u64 = 2500;
pub const LOSS_RECOVERY_DELAY_MS: u64 = 3000;
pub const COMBAT_LOG_CAPACITY: usize = 50;

// Hero limits
pub const MIN_RARITY: u8 = 1;
pub const MAX_RARITY: u8 = 5;
pub const BASE_MAX_LEVEL: u32 = 100;
pub const MAX_LEVEL_PER_AWAKENING: u32 = 10;
pub const MAX_AWAKENINGS: u32 = 5;
pub const AWAKENING_STAT_BONUS: f64 = 0.10;
pub const FATIGUE_STAT_MULTIPLIER: f64 = 0.8;
pub const FATIGUE_DURATION_MS: u64 = 60 * 60 * 1000;
pub const SKILL_POINTS_PER_LEVEL: u32 = 1;

// Stat growth multiplier by hero rarity (index 0 = rarity 1)
pub const RARITY_GROWTH_MULTIPLIERS: [f64; 5] = [0.8, 0.9, 1.0, 1.2, 1.5];

// XP curve: 100*L up to 20, 150*L up to 50, floor(200*L*(1+L/100)) beyond
pub const XP_CURVE_EARLY_MAX_LEVEL: u32 = 20;
pub const XP_CURVE_MID_MAX_LEVEL: u32 = 50;
pub const XP_CURVE_EARLY_PER_LEVEL: u64 = 100;
pub const XP_CURVE_MID_PER_LEVEL: u64 = 150;
pub const XP_CURVE_LATE_PER_LEVEL: f64 = 200.0;

// Wave composition
pub const BOSS_WAVE_INTERVAL: u32 = 10;
pub const BOSS_STAT_MULTIPLIER: f64 = 3.0;
pub const WAVES_PER_EXTRA_ENEMY: u32 = 5;
pub const MAX_BASE_ENEMIES: u32 = 5;
pub const ENEMY_BASE_HP: f64 = 35.0;
pub const ENEMY_BASE_ATK: f64 = 7.0;
pub const ENEMY_BASE_DEF: f64 = 2.0;
pub const ENEMY_SCALING_PER_WAVE: f64 = 0.12;
pub const DUNGEON_EVENT_CHANCE: f64 = 0.30;

// Dungeon event tuning
pub const TREASURE_BASE_GOLD: u64 = 10;
pub const TREASURE_GOLD_PER_POWER: u64 = 2;
pub const LUCKY_BASE_XP: u64 = 5;
pub const REST_HEAL_FRACTION: f64 = 0.5;
pub const ELITE_ENEMY_MULTIPLIER: f64 = 1.5;
pub const CURSED_ENEMY_MULTIPLIER: f64 = 1.25;
pub const CURSED_ENEMY_COUNT_BONUS: u32 = 1;

// Wave rewards
pub const WAVE_GOLD_BASE: u64 = 5;
pub const BOSS_WAVE_GOLD_BASE: u64 = 10;
pub const WAVE_XP_BASE: u64 = 3;
pub const BOSS_WAVE_XP_BASE: u64 = 6;
pub const PARTY_POWER_DIVISOR: u32 = 10;

// Loot
pub const LOOT_DROP_CHANCE: f64 = 0.3;
pub const BOSS_LOOT_DROP_CHANCE: f64 = 1.0;
pub const BOSS_RARITY_ROLL_FACTOR: f64 = 0.5;
pub const ITEM_BASE_STAT: f64 = 5.0;
pub const ITEM_STAT_PER_RARITY: f64 = 0.5;
pub const ITEM_STAT_PER_WAVE: f64 = 0.1;
pub const ARMOR_HP_PER_BASE: u32 = 3;
pub const ACCESSORY_SPD_FACTOR: f64 = 0.5;
pub const ACCESSORY_LCK_FACTOR: f64 = 0.3;

// Inventory and Soulware
pub const MAX_INVENTORY_SLOTS: usize = 50;
pub const MAX_SYSTEM_WIDE_SOULWARE: usize = 3;
pub const RECYCLE_GOLD_PER_LEVEL: u64 = 2;

// Skill tree
pub const SKILL_RESET_GOLD_COST: u64 = 500;

// Prestige: sigils = floor(sqrt(lifetime_gold / 1000)), +5% all stats per sigil
pub const SIGIL_GOLD_DIVISOR: f64 = 1000.0;
pub const SIGIL_BONUS_PER_POINT: f64 = 0.05;
pub const STARTING_SOUL_CORES: u64 = 50;

// Offline progress
pub const OFFLINE_GOLD_PER_HOUR: f64 = 100.0;
pub const MAX_OFFLINE_HOURS: f64 = 24.0;
pub const MS_PER_HOUR: u64 = 60 * 60 * 1000;
