//! Main simulation runner driving a real [`DungeonRunner`].
//!
//! Each run starts from a fresh account, pushes waves until the target wave
//! or the time budget is reached, and reads its statistics back out of the
//! game state.

use super::config::SimConfig;
use super::report::SimReport;
use crate::core::config::DungeonConfig;
use crate::core::game_state::GameState;
use crate::dungeon::runner::DungeonRunner;
use crate::items::types::Rarity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Statistics for a single simulated run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub final_wave: u32,
    pub reached_target: bool,
    pub sim_ms: u64,
    pub gold_earned: u64,
    pub avg_hero_level: f64,
    pub highest_hero_level: u32,
    pub party_wipes: u64,
    pub enemies_killed: u64,
    pub bosses_killed: u64,
    pub items_found: u64,
    pub items_lost: u64,
    pub legendary_items: u64,
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + run_idx as u64),
            None => ChaCha8Rng::from_entropy(),
        };

        let run = simulate_single_run(config, rng);
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Wave {}, Avg Level {:.1}, Gold {}, Wipes {}, Items {}",
                run_idx + 1,
                config.num_runs,
                run.final_wave,
                run.avg_hero_level,
                run.gold_earned,
                run.party_wipes,
                run.items_found
            );
        }
        all_runs.push(run);
    }

    SimReport::from_runs(all_runs, config.target_wave)
}

/// Simulates one account from a fresh start.
pub fn simulate_single_run(config: &SimConfig, rng: ChaCha8Rng) -> RunStats {
    let dungeon_config = DungeonConfig {
        event_chance: config.event_chance,
        ..DungeonConfig::default()
    };
    let mut runner = DungeonRunner::new(GameState::new())
        .with_config(dungeon_config)
        .with_rng(rng);
    runner.start();

    let step = config.step_ms.max(1);
    let mut elapsed = 0;
    while elapsed < config.max_sim_ms && runner.state().wave() < config.target_wave {
        runner.advance(step);
        elapsed += step;
    }
    runner.stop();

    collect_stats(&runner, config.target_wave, elapsed)
}

fn collect_stats(runner: &DungeonRunner, target_wave: u32, sim_ms: u64) -> RunStats {
    let state = runner.state();
    let hero_count = state.heroes.len().max(1) as f64;
    RunStats {
        final_wave: state.wave(),
        reached_target: state.wave() >= target_wave,
        sim_ms,
        gold_earned: state.stats.total_gold_earned,
        avg_hero_level: state.heroes.iter().map(|h| h.level as f64).sum::<f64>() / hero_count,
        highest_hero_level: state.stats.highest_hero_level,
        party_wipes: state.stats.total_party_wipes,
        enemies_killed: state.stats.total_enemies_killed,
        bosses_killed: state.stats.total_bosses_killed,
        items_found: state.stats.total_items_found,
        items_lost: state.stats.total_items_lost,
        legendary_items: state
            .inventory
            .items()
            .iter()
            .filter(|item| item.rarity == Rarity::Legendary)
            .count() as u64,
    }
}
