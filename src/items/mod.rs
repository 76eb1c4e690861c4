//! Item system: types, equipment slots, inventory, and loot generation.

#![allow(unused_imports)]

pub mod equipment;
pub mod generation;
pub mod inventory;
pub mod types;

pub use equipment::*;
pub use generation::*;
pub use inventory::*;
pub use types::*;
