//! Dungeon crawling: wave composition, the combat clock, and update fan-out.

#![allow(unused_imports)]

pub mod notify;
pub mod runner;
pub mod types;
pub mod waves;

pub use notify::*;
pub use runner::*;
pub use types::*;
pub use waves::*;
