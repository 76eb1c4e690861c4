//! Headless balance simulator.
//!
//! Runs many seeded accounts through the real [`DungeonRunner`](crate::dungeon::DungeonRunner)
//! to analyze:
//! - How far a starter party pushes in a time budget
//! - Where boss walls cause party wipes
//! - Drop volume and inventory pressure

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, simulate_single_run, RunStats};
