use super::attributes::{GrowthRates, StatBlock};
use super::derived_stats::StatPipeline;
use super::progression::required_xp;
use crate::core::constants::{
    BASE_MAX_LEVEL, FATIGUE_DURATION_MS, MAX_AWAKENINGS, MAX_LEVEL_PER_AWAKENING, MAX_RARITY,
    MIN_RARITY,
};
use crate::core::error::{DungeonError, DungeonResult};
use crate::items::equipment::Equipment;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroRole {
    Tank,
    Dps,
    Support,
}

impl HeroRole {
    pub fn name(&self) -> &'static str {
        match self {
            HeroRole::Tank => "Tank",
            HeroRole::Dps => "DPS",
            HeroRole::Support => "Support",
        }
    }
}

/// Static blueprint a hero is created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroTemplate {
    pub id: String,
    pub name: String,
    pub rarity: u8,
    pub role: HeroRole,
    pub base_stats: StatBlock,
    pub growth_rates: GrowthRates,
}

impl HeroTemplate {
    pub fn basic_warrior() -> Self {
        Self {
            id: "basic_warrior".to_string(),
            name: "Firewall Knight".to_string(),
            rarity: 1,
            role: HeroRole::Tank,
            base_stats: StatBlock::new(120, 12, 8, 8, 5),
            growth_rates: GrowthRates::new(12.0, 2.0, 1.5, 0.5, 0.3),
        }
    }

    pub fn basic_dps() -> Self {
        Self {
            id: "basic_dps".to_string(),
            name: "Packet Striker".to_string(),
            rarity: 1,
            role: HeroRole::Dps,
            base_stats: StatBlock::new(80, 20, 4, 12, 8),
            growth_rates: GrowthRates::new(8.0, 3.0, 0.8, 1.0, 0.5),
        }
    }

    pub fn basic_support() -> Self {
        Self {
            id: "basic_support".to_string(),
            name: "Cache Cleric".to_string(),
            rarity: 1,
            role: HeroRole::Support,
            base_stats: StatBlock::new(90, 10, 6, 10, 12),
            growth_rates: GrowthRates::new(9.0, 1.5, 1.0, 0.8, 1.0),
        }
    }

    /// Built-in templates, in starter-party order.
    pub fn all() -> Vec<HeroTemplate> {
        vec![
            Self::basic_warrior(),
            Self::basic_dps(),
            Self::basic_support(),
        ]
    }

    pub fn find(template_id: &str) -> DungeonResult<HeroTemplate> {
        Self::all()
            .into_iter()
            .find(|template| template.id == template_id)
            .ok_or_else(|| DungeonError::UnknownTemplate {
                template_id: template_id.to_string(),
            })
    }
}

/// A persistent party member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: Uuid,
    pub template_id: String,
    pub name: String,
    /// 1 (Common) to 5 (Legendary)
    pub rarity: u8,
    pub role: HeroRole,

    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,

    pub base_stats: StatBlock,
    pub growth_rates: GrowthRates,
    /// Output of the stat pipeline. Never edited by hand.
    pub current_stats: StatBlock,
    pub equipment: Equipment,
    pub awakenings: u32,
    pub current_hp: u32,

    pub on_dispatch: bool,
    pub dispatch_id: Option<String>,
    pub dispatch_end_time: Option<u64>,
    pub fatigued: bool,
    pub fatigue_end_time: Option<u64>,

    pub skill_points: u32,
    pub unlocked_skill_nodes: Vec<String>,

    /// Simulation ms of the last attack; None means ready
    #[serde(skip)]
    pub last_attack_time: Option<u64>,
}

impl Hero {
    /// Creates a hero at `level` with full HP and one skill point per level
    /// above 1. `level` is clamped to `1..=100`; a new hero has no awakenings.
    pub fn from_template(template: &HeroTemplate, level: u32) -> Self {
        let level = level.clamp(1, BASE_MAX_LEVEL);
        let mut hero = Self {
            id: Uuid::new_v4(),
            template_id: template.id.clone(),
            name: template.name.clone(),
            rarity: template.rarity.clamp(MIN_RARITY, MAX_RARITY),
            role: template.role,
            level,
            xp: 0,
            xp_to_next_level: required_xp(level + 1),
            base_stats: template.base_stats,
            growth_rates: template.growth_rates,
            current_stats: StatBlock::default(),
            equipment: Equipment::new(),
            awakenings: 0,
            current_hp: 0,
            on_dispatch: false,
            dispatch_id: None,
            dispatch_end_time: None,
            fatigued: false,
            fatigue_end_time: None,
            skill_points: level - 1,
            unlocked_skill_nodes: Vec::new(),
            last_attack_time: None,
        };
        StatPipeline::default().compute(&mut hero, &[], 0);
        hero.full_heal();
        hero
    }

    /// 100, plus 10 per awakening.
    pub fn max_level(&self) -> u32 {
        BASE_MAX_LEVEL + self.awakenings * MAX_LEVEL_PER_AWAKENING
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Alive and not away on a dispatch.
    pub fn can_fight(&self) -> bool {
        self.is_alive() && !self.on_dispatch
    }

    pub fn full_heal(&mut self) {
        self.current_hp = self.current_stats.hp;
    }

    pub fn heal(&mut self, amount: u32) {
        self.current_hp = self
            .current_hp
            .saturating_add(amount)
            .min(self.current_stats.hp);
    }

    /// Applies damage. Returns true when this hit took the hero to 0 HP.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.current_hp = self.current_hp.saturating_sub(amount);
        was_alive && !self.is_alive()
    }

    /// Adds one awakening. Caller recomputes stats.
    pub fn awaken(&mut self) -> DungeonResult<u32> {
        if self.awakenings >= MAX_AWAKENINGS {
            return Err(DungeonError::MaxAwakenings);
        }
        self.awakenings += 1;
        Ok(self.awakenings)
    }

    pub fn is_fatigued(&self, now_ms: u64) -> bool {
        self.fatigued && self.fatigue_end_time.is_some_and(|end| end > now_ms)
    }

    pub fn can_send_on_dispatch(&self, now_ms: u64) -> DungeonResult<()> {
        if self.on_dispatch {
            return Err(DungeonError::AlreadyOnDispatch);
        }
        if self.is_fatigued(now_ms) {
            let remaining = self.fatigue_end_time.unwrap_or(now_ms) - now_ms;
            return Err(DungeonError::Fatigued {
                minutes_remaining: remaining.div_ceil(60_000),
            });
        }
        Ok(())
    }

    pub fn send_on_dispatch(
        &mut self,
        dispatch_id: impl Into<String>,
        end_time_ms: u64,
        now_ms: u64,
    ) -> DungeonResult<()> {
        self.can_send_on_dispatch(now_ms)?;
        self.on_dispatch = true;
        self.dispatch_id = Some(dispatch_id.into());
        self.dispatch_end_time = Some(end_time_ms);
        Ok(())
    }

    /// Clears dispatch state. A failed dispatch leaves the hero fatigued for
    /// an hour.
    pub fn return_from_dispatch(&mut self, success: bool, now_ms: u64) {
        self.on_dispatch = false;
        self.dispatch_id = None;
        self.dispatch_end_time = None;
        if !success {
            self.fatigued = true;
            self.fatigue_end_time = Some(now_ms + FATIGUE_DURATION_MS);
        }
    }
}
