//! Reincarn Dungeon - idle dungeon-crawler core.
//!
//! Heroes push through endless waves on a simulated clock, earning gold, XP
//! and loot. Hosts drive the [`dungeon::DungeonRunner`] and observe it through
//! snapshots and notifications.

pub mod character;
pub mod core;
pub mod dungeon;
pub mod items;
pub mod simulator;
