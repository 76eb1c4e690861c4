//! Heroes, their stats, and everything that grows them.

#![allow(unused_imports)]

pub mod attributes;
pub mod derived_stats;
pub mod hero;
pub mod prestige;
pub mod progression;
pub mod skill_tree;

pub use attributes::*;
pub use derived_stats::*;
pub use hero::*;
pub use prestige::*;
pub use progression::*;
pub use skill_tree::*;
