//! Core game state, configuration, and the simulation clock.

#![allow(unused_imports)]

pub mod config;
pub mod constants;
pub mod error;
pub mod game_state;
pub mod offline;
pub mod timers;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use game_state::*;
pub use offline::*;
pub use timers::*;
