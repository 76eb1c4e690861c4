use thiserror::Error;

/// Caller-visible failures of roster, inventory and prestige operations.
///
/// Data-driven content problems (unknown stat keys, unparseable Soulware
/// conditions) never surface here; they are ignored where they occur.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DungeonError {
    #[error("Inventory full")]
    InventoryFull,

    #[error("Item not found: {id}")]
    ItemNotFound { id: String },

    #[error("Hero not found: {id}")]
    HeroNotFound { id: String },

    #[error("Hero template not found: {template_id}")]
    UnknownTemplate { template_id: String },

    #[error("Invalid equipment slot")]
    InvalidSlot,

    #[error("System-wide items cannot be equipped to individual heroes")]
    SystemWideOnly,

    #[error("Only system-wide Soulware can be equipped here")]
    NotSystemWide,

    #[error("All system-wide slots are full")]
    SoulwareSlotsFull,

    #[error("Max awakenings reached")]
    MaxAwakenings,

    #[error("Skill already unlocked")]
    SkillAlreadyUnlocked,

    #[error("Missing prerequisite skill: {required}")]
    MissingPrerequisite { required: String },

    #[error("Need {required} skill points (have {available})")]
    NotEnoughSkillPoints { required: u32, available: u32 },

    #[error("Need {required} gold (have {available})")]
    NotEnoughGold { required: u64, available: u64 },

    #[error("No skills to reset")]
    NoSkillsToReset,

    #[error("Hero is already on a dispatch")]
    AlreadyOnDispatch,

    #[error("Hero is fatigued ({minutes_remaining} minutes remaining)")]
    Fatigued { minutes_remaining: u64 },

    #[error("Need more lifetime gold to prestige")]
    PrestigeUnavailable,

    #[error("Stop the dungeon before doing that")]
    RunnerActive,
}

/// Result type alias for dungeon operations
pub type DungeonResult<T> = Result<T, DungeonError>;
