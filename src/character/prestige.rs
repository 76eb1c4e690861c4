use super::attributes::ALL_STATS_PERCENT_KEY;
use crate::core::constants::{SIGIL_BONUS_PER_POINT, SIGIL_GOLD_DIVISOR, STARTING_SOUL_CORES};
use crate::core::error::{DungeonError, DungeonResult};
use crate::core::game_state::{starter_party, DungeonState, GameState};
use crate::items::types::{Item, ItemType, Rarity};
use uuid::Uuid;

/// Sigil points a prestige would grant for `lifetime_gold`.
///
/// `floor(sqrt(lifetime_gold / 1000))`
pub fn sigils_for_gold(lifetime_gold: u64) -> u32 {
    (lifetime_gold as f64 / SIGIL_GOLD_DIVISOR).sqrt().floor() as u32
}

/// Gold still needed before the next sigil point.
pub fn gold_to_next_sigil(lifetime_gold: u64) -> u64 {
    let next = sigils_for_gold(lifetime_gold) as u64 + 1;
    (next * next * SIGIL_GOLD_DIVISOR as u64).saturating_sub(lifetime_gold)
}

/// True once a prestige would grant at least one sigil.
pub fn can_prestige(state: &GameState) -> bool {
    sigils_for_gold(state.lifetime_gold) > 0
}

/// Global modifier granting +5% to every stat per sigil point.
///
/// Applied alongside system-wide Soulware. None with no sigils.
pub fn sigil_modifier(sigil_points: u32) -> Option<Item> {
    if sigil_points == 0 {
        return None;
    }
    let mut item = Item::new("System Sigils", ItemType::SystemWide, Rarity::Legendary, 0)
        .with_bonus(
            ALL_STATS_PERCENT_KEY,
            sigil_points as f64 * SIGIL_BONUS_PER_POINT,
        );
    item.id = Uuid::nil();
    Some(item)
}

/// Converts this cycle's gold into sigil points and resets the run.
///
/// Wave, currencies, roster, inventory and Soulware reset; sigils, prestige
/// count and lifetime statistics carry over. Returns the sigils gained.
pub fn perform_prestige(state: &mut GameState) -> DungeonResult<u32> {
    let gained = sigils_for_gold(state.lifetime_gold);
    if gained == 0 {
        return Err(DungeonError::PrestigeUnavailable);
    }

    state.prestige.sigil_points += gained;
    state.prestige.total_prestiges += 1;

    state.dungeon = DungeonState::default();
    state.gold = 0;
    // Sigils pay for one cycle's gold; the all-time total lives in stats.
    state.lifetime_gold = 0;
    state.xp = 0;
    state.soul_cores = STARTING_SOUL_CORES;
    state.fragments = 0;
    state.heroes = starter_party();
    state.inventory.clear();
    state.system_wide_soulware.clear();

    log::info!(
        "prestige {} complete: +{} sigils ({} total)",
        state.prestige.total_prestiges,
        gained,
        state.prestige.sigil_points
    );
    Ok(gained)
}
