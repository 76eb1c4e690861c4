use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub max_hp: u32,
    pub current_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub is_boss: bool,
    /// Simulation ms of the last attack; None means ready
    #[serde(skip)]
    pub last_attack_time: Option<u64>,
}

impl Enemy {
    pub fn new(name: impl Into<String>, max_hp: u32, atk: u32, def: u32, is_boss: bool) -> Self {
        Self {
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            atk,
            def,
            is_boss,
            last_attack_time: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Applies damage. Returns true when this hit was the killing blow.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.current_hp = self.current_hp.saturating_sub(amount);
        was_alive && !self.is_alive()
    }

    /// Back to full HP with its cooldown cleared.
    pub fn reset(&mut self) {
        self.current_hp = self.max_hp;
        self.last_attack_time = None;
    }

    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            name: self.name.clone(),
            current_hp: self.current_hp,
            max_hp: self.max_hp,
            atk: self.atk,
            def: self.def,
            is_boss: self.is_boss,
        }
    }
}

/// Read-only copy of an enemy for observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub name: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub is_boss: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Treasure,
    Elite,
    Rest,
    Cursed,
    Lucky,
}

impl EventKind {
    pub fn all() -> [EventKind; 5] {
        [
            EventKind::Treasure,
            EventKind::Elite,
            EventKind::Rest,
            EventKind::Cursed,
            EventKind::Lucky,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            EventKind::Treasure => "treasure",
            EventKind::Elite => "elite",
            EventKind::Rest => "rest",
            EventKind::Cursed => "cursed",
            EventKind::Lucky => "lucky",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Treasure => "Treasure Cache",
            EventKind::Elite => "Elite Patrol",
            EventKind::Rest => "Resting Spot",
            EventKind::Cursed => "Cursed Ground",
            EventKind::Lucky => "Lucky Find",
        }
    }

    /// Relative weight in the event roll.
    pub fn weight(&self) -> u32 {
        match self {
            EventKind::Treasure => 30,
            EventKind::Elite => 20,
            EventKind::Rest => 20,
            EventKind::Cursed => 15,
            EventKind::Lucky => 15,
        }
    }
}

/// Special event rolled for a non-boss wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DungeonEvent {
    pub kind: EventKind,
    /// Multiplier on every enemy stat for this wave
    pub enemy_multiplier: f64,
    /// Extra enemies spawned this wave
    pub enemy_count_bonus: u32,
}

/// One-time reward an event grants when its wave spawns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventEffect {
    Gold(u64),
    Xp(u64),
    /// Fraction of max HP restored to every hero not on a dispatch
    Heal(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatLogEntry {
    Attack {
        attacker: String,
        target: String,
        damage: u32,
    },
    EnemyDefeated {
        name: String,
    },
    HeroDefeated {
        name: String,
    },
    PartyWiped {
        wave: u32,
    },
}

impl CombatLogEntry {
    pub fn message(&self) -> String {
        match self {
            CombatLogEntry::Attack {
                attacker,
                target,
                damage,
            } => format!("{attacker} hits {target} for {damage}"),
            CombatLogEntry::EnemyDefeated { name } => format!("{name} defeated!"),
            CombatLogEntry::HeroDefeated { name } => format!("{name} has fallen!"),
            CombatLogEntry::PartyWiped { wave } => format!("Party wiped on wave {wave}"),
        }
    }
}

/// Owned view of the dungeon for observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonSnapshot {
    pub wave: u32,
    pub gold: u64,
    pub xp: u64,
    pub running: bool,
    pub is_boss_wave: bool,
    pub enemies: Vec<EnemySnapshot>,
    pub alive_enemies: usize,
    pub current_event: Option<EventKind>,
    /// Percent of the wave's enemy HP already removed, 0-100
    pub progress: u32,
}
