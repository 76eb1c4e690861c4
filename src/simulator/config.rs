//! Simulation configuration.

use crate::core::constants::{DUNGEON_EVENT_CHANCE, TICK_INTERVAL_MS};
use serde::{Deserialize, Serialize};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Simulated milliseconds per run before timeout
    pub max_sim_ms: u64,

    /// Stop a run once this wave is reached
    pub target_wave: u32,

    /// Chance that a non-boss wave rolls a dungeon event
    pub event_chance: f64,

    /// Size of each `advance` step
    pub step_ms: u64,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            max_sim_ms: 4 * 60 * 60 * 1000,
            target_wave: 50,
            event_chance: DUNGEON_EVENT_CHANCE,
            step_ms: TICK_INTERVAL_MS,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Short runs aimed at the first boss walls.
    pub fn early_game_test(target_wave: u32) -> Self {
        Self {
            num_runs: 50,
            target_wave,
            max_sim_ms: 60 * 60 * 1000,
            ..Default::default()
        }
    }

    /// Long runs with events off, to isolate raw wave scaling.
    pub fn scaling_test() -> Self {
        Self {
            num_runs: 20,
            target_wave: 200,
            max_sim_ms: 24 * 60 * 60 * 1000,
            event_chance: 0.0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let early = SimConfig::early_game_test(20);
        assert_eq!(early.target_wave, 20);
        assert_eq!(early.num_runs, 50);
        assert_eq!(early.step_ms, 500);

        let scaling = SimConfig::scaling_test();
        assert_eq!(scaling.event_chance, 0.0);
        assert!(scaling.max_sim_ms > early.max_sim_ms);
    }
}
