//! Offline progression.
//!
//! Time away pays a flat gold rate, capped so long absences do not outpace
//! active play.

use super::constants::{MAX_OFFLINE_HOURS, MS_PER_HOUR, OFFLINE_GOLD_PER_HOUR};
use super::game_state::GameState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineReport {
    pub elapsed_ms: u64,
    /// Hours that actually paid out after the cap
    pub effective_hours: f64,
    pub gold_gained: u64,
}

/// Gold earned for `elapsed_ms` away: 100 per hour, at most 24 hours.
pub fn calculate_offline_gold(elapsed_ms: u64) -> u64 {
    let hours = (elapsed_ms as f64 / MS_PER_HOUR as f64).min(MAX_OFFLINE_HOURS);
    (hours * OFFLINE_GOLD_PER_HOUR).floor() as u64
}

/// Credits offline gold to `state`. Counts toward lifetime gold.
pub fn apply_offline_progress(state: &mut GameState, elapsed_ms: u64) -> OfflineReport {
    let gold_gained = calculate_offline_gold(elapsed_ms);
    state.add_gold(gold_gained);
    if gold_gained > 0 {
        log::info!("offline progress: +{gold_gained} gold");
    }
    OfflineReport {
        elapsed_ms,
        effective_hours: (elapsed_ms as f64 / MS_PER_HOUR as f64).min(MAX_OFFLINE_HOURS),
        gold_gained,
    }
}
