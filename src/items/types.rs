use crate::character::attributes::{Stat, StatBonuses};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Equipment slot on a hero. Every hero has exactly these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

impl EquipmentSlot {
    pub fn all() -> [EquipmentSlot; 3] {
        [
            EquipmentSlot::Weapon,
            EquipmentSlot::Armor,
            EquipmentSlot::Accessory,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "Weapon",
            EquipmentSlot::Armor => "Armor",
            EquipmentSlot::Accessory => "Accessory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    Weapon,
    Armor,
    Accessory,
    /// Soulware that buffs the whole roster instead of one hero
    SystemWide,
}

impl ItemType {
    /// The hero slot this item goes into, if it has one.
    pub fn slot(&self) -> Option<EquipmentSlot> {
        match self {
            ItemType::Weapon => Some(EquipmentSlot::Weapon),
            ItemType::Armor => Some(EquipmentSlot::Armor),
            ItemType::Accessory => Some(EquipmentSlot::Accessory),
            ItemType::SystemWide => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Weapon => "Weapon",
            ItemType::Armor => "Armor",
            ItemType::Accessory => "Accessory",
            ItemType::SystemWide => "System-wide Soulware",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common = 1,
    Uncommon = 2,
    Rare = 3,
    Epic = 4,
    Legendary = 5,
}

impl Rarity {
    pub fn all() -> [Rarity; 5] {
        [
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }

    /// Numeric tier, 1 (Common) to 5 (Legendary).
    pub fn tier(&self) -> u8 {
        *self as u8
    }

    /// Clamps out-of-range tiers into 1..=5.
    pub fn from_tier(tier: u8) -> Rarity {
        match tier {
            0 | 1 => Rarity::Common,
            2 => Rarity::Uncommon,
            3 => Rarity::Rare,
            4 => Rarity::Epic,
            _ => Rarity::Legendary,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// Comparison used by Soulware conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Comparison {
    fn parse(op: &str) -> Option<Comparison> {
        match op {
            "<" => Some(Comparison::Lt),
            "<=" => Some(Comparison::Le),
            ">" => Some(Comparison::Gt),
            ">=" => Some(Comparison::Ge),
            "==" | "===" => Some(Comparison::Eq),
            _ => None,
        }
    }

    pub fn holds(&self, left: u32, right: u32) -> bool {
        match self {
            Comparison::Lt => left < right,
            Comparison::Le => left <= right,
            Comparison::Gt => left > right,
            Comparison::Ge => left >= right,
            Comparison::Eq => left == right,
        }
    }
}

/// Predicate on a hero's attributes that gates a conditional effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    HeroRarity { op: Comparison, value: u32 },
}

impl Condition {
    /// Parses expressions like `"heroRarity <= 3"`. Anything else is None.
    pub fn parse(expr: &str) -> Option<Condition> {
        let rest = expr.trim().strip_prefix("heroRarity")?.trim_start();
        let op_len = rest
            .find(|c: char| !matches!(c, '<' | '>' | '='))
            .unwrap_or(rest.len());
        let (op, value) = rest.split_at(op_len);
        let op = Comparison::parse(op)?;
        let value = value.trim().parse().ok()?;
        Some(Condition::HeroRarity { op, value })
    }

    pub fn matches(&self, hero_rarity: u8) -> bool {
        match self {
            Condition::HeroRarity { op, value } => op.holds(hero_rarity as u32, *value),
        }
    }
}

/// Bonus that only applies to heroes satisfying `condition`.
///
/// The condition is kept as text so content can be authored as data; an
/// expression that does not parse never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalEffect {
    pub condition: String,
    pub effect: StatBonuses,
}

impl ConditionalEffect {
    pub fn applies_to(&self, hero_rarity: u8) -> bool {
        Condition::parse(&self.condition).is_some_and(|c| c.matches(hero_rarity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    /// Wave the item dropped on
    pub level: u32,
    pub stat_bonuses: StatBonuses,
    #[serde(default)]
    pub conditional_effects: Vec<ConditionalEffect>,
}

impl Item {
    pub fn new(name: impl Into<String>, item_type: ItemType, rarity: Rarity, level: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            item_type,
            rarity,
            level,
            stat_bonuses: StatBonuses::new(),
            conditional_effects: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, key: &str, value: f64) -> Self {
        self.stat_bonuses.insert(key.to_string(), value);
        self
    }

    pub fn with_conditional(mut self, condition: &str, effect: StatBonuses) -> Self {
        self.conditional_effects.push(ConditionalEffect {
            condition: condition.to_string(),
            effect,
        });
        self
    }

    pub fn is_system_wide(&self) -> bool {
        self.item_type == ItemType::SystemWide
    }

    /// Flat bonus for one stat, 0 if absent.
    pub fn flat_bonus(&self, stat: Stat) -> f64 {
        self.stat_bonuses.get(stat.key()).copied().unwrap_or(0.0)
    }

    /// Short summary like `"+12 ATK +3 DEF"`.
    pub fn stat_summary(&self) -> String {
        let parts: Vec<String> = self
            .stat_bonuses
            .iter()
            .map(|(key, value)| match Stat::from_key(key) {
                Some(stat) => format!("+{} {}", value, stat.abbrev()),
                None => format!("+{} {}", value, key),
            })
            .collect();
        if parts.is_empty() {
            "No bonuses".to_string()
        } else {
            parts.join(" ")
        }
    }
}
