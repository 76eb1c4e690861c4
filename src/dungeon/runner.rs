//! The combat clock.
//!
//! A [`DungeonRunner`] owns the game state and drives it on a simulated
//! timeline: a repeating tick resolves attacks on per-actor cooldowns, and a
//! one-shot timer heals and retries the wave after a party wipe. The host
//! feeds elapsed time through [`DungeonRunner::advance`].

use super::notify::{EventBus, NotificationKind};
use super::types::{CombatLogEntry, DungeonEvent, DungeonSnapshot, Enemy, EventEffect};
use super::waves::{event_effect, spawn_wave};
use crate::character::derived_stats::StatPipeline;
use crate::character::hero::{Hero, HeroTemplate};
use crate::character::prestige::perform_prestige;
use crate::character::progression::{add_xp, LevelUpReport};
use crate::character::skill_tree::{self, SkillNode};
use crate::core::config::DungeonConfig;
use crate::core::constants::{
    BOSS_WAVE_GOLD_BASE, BOSS_WAVE_XP_BASE, PARTY_POWER_DIVISOR, WAVE_GOLD_BASE, WAVE_XP_BASE,
};
use crate::core::error::{DungeonError, DungeonResult};
use crate::core::game_state::GameState;
use crate::core::offline::{self, OfflineReport};
use crate::core::timers::{SimClock, TimerKind};
use crate::items::generation::try_drop_item;
use crate::items::inventory::{recycle_value, RecycleValue};
use crate::items::types::EquipmentSlot;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerPhase {
    /// No timers armed
    Idle,
    /// Ticking
    Active,
    /// Party wiped; waiting on the recovery timer
    ResolvingLoss,
}

/// What a finished wave paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveReward {
    pub wave: u32,
    pub gold: u64,
    pub xp: u64,
    pub party_power: u32,
}

/// `max(1, floor(Σ atk / 10))` over heroes able to fight.
pub fn reward_party_power(state: &GameState) -> u32 {
    let total_atk: u32 = state
        .heroes
        .iter()
        .filter(|hero| hero.can_fight())
        .map(|hero| hero.current_stats.atk)
        .sum();
    (total_atk / PARTY_POWER_DIVISOR).max(1)
}

/// Gold and XP for clearing `wave`.
pub fn wave_reward(wave: u32, is_boss_wave: bool, party_power: u32) -> WaveReward {
    let (gold_base, xp_base) = if is_boss_wave {
        (BOSS_WAVE_GOLD_BASE, BOSS_WAVE_XP_BASE)
    } else {
        (WAVE_GOLD_BASE, WAVE_XP_BASE)
    };
    WaveReward {
        wave,
        gold: gold_base + party_power as u64,
        xp: xp_base + (party_power / 2) as u64,
        party_power,
    }
}

pub struct DungeonRunner {
    state: GameState,
    config: DungeonConfig,
    pipeline: StatPipeline,
    clock: SimClock,
    rng: Box<dyn RngCore>,
    bus: EventBus,
    phase: RunnerPhase,
    enemies: Vec<Enemy>,
    is_boss_wave: bool,
    current_event: Option<DungeonEvent>,
    combat_log: VecDeque<CombatLogEntry>,
    last_reward: Option<WaveReward>,
}

impl DungeonRunner {
    pub fn new(state: GameState) -> Self {
        let config = DungeonConfig::default();
        let mut runner = Self {
            state,
            combat_log: VecDeque::with_capacity(config.combat_log_capacity),
            config,
            pipeline: StatPipeline::default(),
            clock: SimClock::new(),
            rng: Box::new(StdRng::from_entropy()),
            bus: EventBus::new(),
            phase: RunnerPhase::Idle,
            enemies: Vec::new(),
            is_boss_wave: false,
            current_event: None,
            last_reward: None,
        };
        runner.refresh_all_heroes();
        runner
    }

    pub fn with_config(mut self, config: DungeonConfig) -> Self {
        self.state.inventory.set_max_slots(config.inventory_slots);
        self.config = config;
        self
    }

    /// Replaces the random source, e.g. with a seeded RNG for tests.
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_pipeline(mut self, pipeline: StatPipeline) -> Self {
        self.pipeline = pipeline;
        self.refresh_all_heroes();
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for hosts and tests. Stats are not recomputed.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn phase(&self) -> RunnerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.dungeon.running
    }

    /// Current simulation time in ms.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn is_boss_wave(&self) -> bool {
        self.is_boss_wave
    }

    pub fn current_event(&self) -> Option<DungeonEvent> {
        self.current_event
    }

    pub fn recovery_pending(&self) -> bool {
        self.clock.one_shot_pending()
    }

    pub fn ticking(&self) -> bool {
        self.clock.interval_armed()
    }

    /// Reward paid by the most recently completed wave.
    pub fn last_reward(&self) -> Option<WaveReward> {
        self.last_reward
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Starts a push on the current wave. Returns false unless idle.
    pub fn start(&mut self) -> bool {
        if self.phase != RunnerPhase::Idle {
            return false;
        }

        self.refresh_all_heroes();
        for hero in self.state.heroes.iter_mut() {
            hero.last_attack_time = None;
            if !hero.on_dispatch {
                hero.full_heal();
            }
        }
        self.spawn_current_wave();

        self.state.dungeon.running = true;
        self.state.dungeon.time_in_wave = 0;
        self.clock.arm_interval(self.config.tick_interval_ms);
        self.phase = RunnerPhase::Active;
        log::info!("dungeon started on wave {}", self.state.dungeon.wave);
        self.publish();
        true
    }

    /// Stops ticking and cancels any pending recovery. Returns false when
    /// there was nothing to stop.
    pub fn stop(&mut self) -> bool {
        let armed = self.clock.interval_armed() || self.clock.one_shot_pending();
        if self.phase == RunnerPhase::Idle && !armed {
            return false;
        }

        self.clock.disarm_interval();
        self.clock.cancel_once();
        self.state.dungeon.running = false;
        self.phase = RunnerPhase::Idle;
        log::info!("dungeon stopped on wave {}", self.state.dungeon.wave);
        self.publish();
        true
    }

    pub fn toggle(&mut self) -> bool {
        if self.phase == RunnerPhase::Idle {
            self.start()
        } else {
            self.stop()
        }
    }

    /// Moves simulated time forward, firing every due timer in order.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.clock.now().saturating_add(elapsed_ms);
        while let Some(kind) = self.clock.next_due(until) {
            match kind {
                TimerKind::Interval => self.tick(),
                TimerKind::OneShot => self.recover(),
            }
        }
        self.clock.advance_to(until);
    }

    /// Runs one tick at the current time without moving the clock.
    pub fn tick_now(&mut self) {
        self.tick();
    }

    // =========================================================================
    // Combat
    // =========================================================================

    fn tick(&mut self) {
        if !self.state.dungeon.running {
            return;
        }
        self.state.dungeon.time_in_wave += self.config.tick_interval_ms;
        self.expire_fatigue();

        let living_enemies: Vec<usize> = (0..self.enemies.len())
            .filter(|&i| self.enemies[i].is_alive())
            .collect();
        if living_enemies.is_empty() {
            self.complete_wave();
            self.publish();
            return;
        }

        let fighting_heroes: Vec<usize> = (0..self.state.heroes.len())
            .filter(|&i| self.state.heroes[i].can_fight())
            .collect();
        if fighting_heroes.is_empty() {
            self.wave_loss();
            self.publish();
            return;
        }

        let now = self.clock.now();
        self.hero_phase(&fighting_heroes, &living_enemies, now);
        self.enemy_phase(&living_enemies, &fighting_heroes, now);
        self.publish();
    }

    /// Every ready hero hits a random enemy from the tick-start roster.
    fn hero_phase(&mut self, heroes: &[usize], targets: &[usize], now: u64) {
        let cooldown = self.config.hero_attack_cooldown_ms;
        for &h in heroes {
            let hero = &mut self.state.heroes[h];
            if hero
                .last_attack_time
                .is_some_and(|last| now.saturating_sub(last) < cooldown)
            {
                continue;
            }
            hero.last_attack_time = Some(now);

            let target = targets[self.rng.gen_range(0..targets.len())];
            let enemy = &mut self.enemies[target];
            let damage = hero.current_stats.atk.saturating_sub(enemy.def).max(1);
            let killed = enemy.take_damage(damage);

            let attack = CombatLogEntry::Attack {
                attacker: hero.name.clone(),
                target: enemy.name.clone(),
                damage,
            };
            let defeated = killed.then(|| (enemy.name.clone(), enemy.is_boss));

            self.state.stats.total_damage_dealt += damage as u64;
            self.push_log(attack);
            if let Some((name, is_boss)) = defeated {
                self.state.stats.total_enemies_killed += 1;
                if is_boss {
                    self.state.stats.total_bosses_killed += 1;
                }
                self.push_log(CombatLogEntry::EnemyDefeated { name });
            }
        }
    }

    /// Every ready enemy still standing hits a random hero from the
    /// tick-start party.
    fn enemy_phase(&mut self, enemies: &[usize], targets: &[usize], now: u64) {
        let cooldown = self.config.enemy_attack_cooldown_ms;
        for &e in enemies {
            let enemy = &mut self.enemies[e];
            if !enemy.is_alive() {
                continue;
            }
            if enemy
                .last_attack_time
                .is_some_and(|last| now.saturating_sub(last) < cooldown)
            {
                continue;
            }
            enemy.last_attack_time = Some(now);

            let target = targets[self.rng.gen_range(0..targets.len())];
            let hero = &mut self.state.heroes[target];
            let damage = enemy.atk.saturating_sub(hero.current_stats.def).max(1);
            let killed = hero.take_damage(damage);

            let attack = CombatLogEntry::Attack {
                attacker: enemy.name.clone(),
                target: hero.name.clone(),
                damage,
            };
            let fallen = killed.then(|| hero.name.clone());

            self.state.stats.total_damage_taken += damage as u64;
            self.push_log(attack);
            if let Some(name) = fallen {
                self.push_log(CombatLogEntry::HeroDefeated { name });
            }
        }
    }

    fn complete_wave(&mut self) {
        let wave = self.state.dungeon.wave;
        let reward = wave_reward(wave, self.is_boss_wave, reward_party_power(&self.state));

        self.state.add_gold(reward.gold);
        self.bus
            .notify(NotificationKind::Gold, &format!("+{} gold", reward.gold));
        self.state.xp += reward.xp;
        self.grant_party_xp(reward.xp);

        let chance = self.config.drop_chance(self.is_boss_wave);
        if let Some(item) = try_drop_item(wave, self.is_boss_wave, chance, &mut self.rng) {
            let message = format!("Found {}", item.name);
            match self.state.store_item(item) {
                Ok(()) => self.bus.notify(NotificationKind::Item, &message),
                Err(err) => {
                    log::warn!("wave {wave} drop lost: {err}");
                    self.state.stats.total_items_lost += 1;
                    self.bus
                        .notify(NotificationKind::Warning, "Inventory full! Item lost.");
                }
            }
        }

        log::info!(
            "wave {wave} cleared: +{} gold, +{} xp",
            reward.gold,
            reward.xp
        );
        self.last_reward = Some(reward);
        self.state.stats.highest_wave = self.state.stats.highest_wave.max(wave);
        self.state.dungeon.wave += 1;
        self.state.dungeon.time_in_wave = 0;
        self.combat_log.clear();
        self.spawn_current_wave();
    }

    /// Splits `xp` evenly across heroes not on a dispatch.
    fn grant_party_xp(&mut self, xp: u64) {
        let recipients = self.state.heroes.iter().filter(|h| !h.on_dispatch).count() as u64;
        if recipients == 0 {
            return;
        }
        let share = xp / recipients;
        let modifiers = self.state.global_modifiers();
        let now = self.clock.now();

        let mut reports: Vec<(String, LevelUpReport)> = Vec::new();
        for hero in self.state.heroes.iter_mut().filter(|h| !h.on_dispatch) {
            let report = add_xp(hero, share, &self.pipeline, &modifiers, now);
            if report.leveled_up() {
                reports.push((hero.name.clone(), report));
            }
        }
        for (name, report) in reports {
            self.state.record_hero_level(report.new_level);
            self.bus.notify(
                NotificationKind::LevelUp,
                &format!("{name} reached level {}", report.new_level),
            );
        }
    }

    fn spawn_current_wave(&mut self) {
        let wave = self.state.dungeon.wave;
        let spawn = spawn_wave(wave, self.config.event_chance, &mut self.rng);
        self.enemies = spawn.enemies;
        self.is_boss_wave = spawn.is_boss_wave;
        self.current_event = spawn.event;

        let Some(event) = spawn.event else {
            return;
        };
        log::info!("wave {wave} event: {}", event.kind.name());
        match event_effect(event.kind, reward_party_power(&self.state)) {
            Some(EventEffect::Gold(gold)) => self.state.add_gold(gold),
            Some(EventEffect::Xp(xp)) => {
                self.state.xp += xp;
                self.grant_party_xp(xp);
            }
            Some(EventEffect::Heal(fraction)) => {
                for hero in self.state.heroes.iter_mut().filter(|h| !h.on_dispatch) {
                    let amount = (hero.current_stats.hp as f64 * fraction).floor() as u32;
                    hero.heal(amount);
                }
            }
            None => {}
        }
        self.bus.notify(NotificationKind::Quest, event.kind.name());
    }

    fn wave_loss(&mut self) {
        let wave = self.state.dungeon.wave;
        self.state.dungeon.running = false;
        self.clock.disarm_interval();
        self.push_log(CombatLogEntry::PartyWiped { wave });
        self.state.stats.total_party_wipes += 1;
        if !self.clock.schedule_once(self.config.loss_recovery_delay_ms) {
            log::debug!("recovery already pending on wave {wave}");
        }
        self.phase = RunnerPhase::ResolvingLoss;
        log::info!("party wiped on wave {wave}");
        self.bus.notify(
            NotificationKind::Warning,
            &format!("Party wiped on wave {wave}. Regrouping..."),
        );
    }

    /// Heals the party and retries the same roster.
    fn recover(&mut self) {
        if self.phase != RunnerPhase::ResolvingLoss {
            return;
        }
        for hero in self.state.heroes.iter_mut() {
            hero.full_heal();
            hero.last_attack_time = None;
        }
        for enemy in self.enemies.iter_mut() {
            enemy.reset();
        }
        self.state.dungeon.running = true;
        self.state.dungeon.time_in_wave = 0;
        self.clock.arm_interval(self.config.tick_interval_ms);
        self.phase = RunnerPhase::Active;
        log::info!("party recovered on wave {}", self.state.dungeon.wave);
        self.publish();
    }

    fn push_log(&mut self, entry: CombatLogEntry) {
        let capacity = self.config.combat_log_capacity;
        if capacity == 0 {
            return;
        }
        while self.combat_log.len() >= capacity {
            self.combat_log.pop_front();
        }
        self.combat_log.push_back(entry);
    }

    // =========================================================================
    // Observation
    // =========================================================================

    pub fn stats(&self) -> DungeonSnapshot {
        let total_hp: u64 = self.enemies.iter().map(|e| e.max_hp as u64).sum();
        let remaining_hp: u64 = self.enemies.iter().map(|e| e.current_hp as u64).sum();
        let progress = if total_hp == 0 {
            0
        } else {
            ((total_hp - remaining_hp) * 100 / total_hp) as u32
        };
        DungeonSnapshot {
            wave: self.state.dungeon.wave,
            gold: self.state.gold,
            xp: self.state.xp,
            running: self.state.dungeon.running,
            is_boss_wave: self.is_boss_wave,
            enemies: self.enemies.iter().map(Enemy::snapshot).collect(),
            alive_enemies: self.enemies.iter().filter(|e| e.is_alive()).count(),
            current_event: self.current_event.map(|event| event.kind),
            progress,
        }
    }

    /// The most recent `limit` entries, oldest first.
    pub fn combat_log(&self, limit: usize) -> Vec<CombatLogEntry> {
        let skip = self.combat_log.len().saturating_sub(limit);
        self.combat_log.iter().skip(skip).cloned().collect()
    }

    pub fn on_update(&mut self, listener: impl FnMut(&DungeonSnapshot) + 'static) {
        self.bus.subscribe(listener);
    }

    pub fn set_notification(&mut self, sink: impl FnMut(NotificationKind, &str) + 'static) {
        self.bus.set_sink(sink);
    }

    fn publish(&mut self) {
        let snapshot = self.stats();
        self.bus.publish(&snapshot);
    }

    // =========================================================================
    // Roster and items
    // =========================================================================

    fn refresh_hero(&mut self, hero_id: Uuid) -> DungeonResult<()> {
        let modifiers = self.state.global_modifiers();
        let now = self.clock.now();
        let hero = self.state.find_hero_mut(hero_id)?;
        self.pipeline.compute(hero, &modifiers, now);
        Ok(())
    }

    /// Recomputes heroes whose fatigue ran out, which also clears the flag.
    fn expire_fatigue(&mut self) {
        let now = self.clock.now();
        if !self
            .state
            .heroes
            .iter()
            .any(|hero| hero.fatigued && !hero.is_fatigued(now))
        {
            return;
        }
        let modifiers = self.state.global_modifiers();
        for hero in self.state.heroes.iter_mut() {
            if hero.fatigued && !hero.is_fatigued(now) {
                self.pipeline.compute(hero, &modifiers, now);
                log::info!("{} is no longer fatigued", hero.name);
            }
        }
    }

    fn refresh_all_heroes(&mut self) {
        let modifiers = self.state.global_modifiers();
        let now = self.clock.now();
        for hero in self.state.heroes.iter_mut() {
            self.pipeline.compute(hero, &modifiers, now);
        }
    }

    fn hero_index(&self, hero_id: Uuid) -> DungeonResult<usize> {
        self.state
            .heroes
            .iter()
            .position(|hero| hero.id == hero_id)
            .ok_or_else(|| DungeonError::HeroNotFound {
                id: hero_id.to_string(),
            })
    }

    /// Recruits a hero from a built-in template.
    pub fn add_hero(&mut self, template_id: &str, level: u32) -> DungeonResult<Uuid> {
        let template = HeroTemplate::find(template_id)?;
        let hero = Hero::from_template(&template, level);
        let id = hero.id;
        self.state.heroes.push(hero);
        self.refresh_hero(id)?;
        if let Ok(hero) = self.state.find_hero_mut(id) {
            hero.full_heal();
        }
        self.state.record_hero_level(level.max(1));
        Ok(id)
    }

    /// Moves an item from the inventory onto a hero. Whatever was in the slot
    /// goes back to the inventory.
    pub fn equip_item(&mut self, hero_id: Uuid, item_id: Uuid) -> DungeonResult<()> {
        let index = self.hero_index(hero_id)?;
        let item = self.state.inventory.remove_item(item_id)?;
        match self.state.heroes[index].equipment.equip(item) {
            Ok(Some(previous)) => {
                // The slot just freed a place in the inventory
                self.state.inventory.add_item(previous)?;
            }
            Ok(None) => {}
            Err((err, item)) => {
                self.state.inventory.add_item(item)?;
                return Err(err);
            }
        }
        self.refresh_hero(hero_id)
    }

    pub fn unequip_item(&mut self, hero_id: Uuid, slot: EquipmentSlot) -> DungeonResult<()> {
        let index = self.hero_index(hero_id)?;
        if self.state.heroes[index].equipment.get(slot).is_none() {
            return Err(DungeonError::InvalidSlot);
        }
        if self.state.inventory.is_full() {
            return Err(DungeonError::InventoryFull);
        }
        let item = self.state.heroes[index].equipment.unequip(slot)?;
        self.state.inventory.add_item(item)?;
        self.refresh_hero(hero_id)
    }

    pub fn equip_soulware(&mut self, item_id: Uuid) -> DungeonResult<()> {
        self.state.equip_soulware(item_id)?;
        self.refresh_all_heroes();
        Ok(())
    }

    pub fn unequip_soulware(&mut self, item_id: Uuid) -> DungeonResult<()> {
        self.state.unequip_soulware(item_id)?;
        self.refresh_all_heroes();
        Ok(())
    }

    /// Returns the new awakening count.
    pub fn awaken_hero(&mut self, hero_id: Uuid) -> DungeonResult<u32> {
        let awakenings = self.state.find_hero_mut(hero_id)?.awaken()?;
        self.refresh_hero(hero_id)?;
        self.bus.notify(
            NotificationKind::Success,
            &format!("Awakening {awakenings} complete"),
        );
        Ok(awakenings)
    }

    pub fn unlock_skill_node(&mut self, hero_id: Uuid, node: &SkillNode) -> DungeonResult<()> {
        let index = self.hero_index(hero_id)?;
        let state = &mut self.state;
        skill_tree::unlock_skill_node(&mut state.heroes[index], node, &mut state.gold)?;
        self.refresh_hero(hero_id)
    }

    /// Returns the refunded skill points.
    pub fn reset_skill_tree(&mut self, hero_id: Uuid) -> DungeonResult<u32> {
        let index = self.hero_index(hero_id)?;
        let state = &mut self.state;
        let refunded = skill_tree::reset_skill_tree(&mut state.heroes[index], &mut state.gold)?;
        self.refresh_hero(hero_id)?;
        Ok(refunded)
    }

    /// Destroys an inventory item for gold and fragments.
    pub fn recycle_item(&mut self, item_id: Uuid) -> DungeonResult<RecycleValue> {
        let item = self.state.inventory.remove_item(item_id)?;
        let value = recycle_value(&item);
        self.state.add_gold(value.gold);
        self.state.fragments += value.fragments;
        Ok(value)
    }

    pub fn send_on_dispatch(
        &mut self,
        hero_id: Uuid,
        dispatch_id: &str,
        duration_ms: u64,
    ) -> DungeonResult<()> {
        let now = self.clock.now();
        self.state
            .find_hero_mut(hero_id)?
            .send_on_dispatch(dispatch_id, now + duration_ms, now)
    }

    /// Brings a hero home. A failed dispatch leaves it fatigued.
    pub fn return_from_dispatch(&mut self, hero_id: Uuid, success: bool) -> DungeonResult<()> {
        let now = self.clock.now();
        self.state
            .find_hero_mut(hero_id)?
            .return_from_dispatch(success, now);
        self.refresh_hero(hero_id)
    }

    /// Resets the run for sigil points. The runner must be stopped first.
    pub fn prestige(&mut self) -> DungeonResult<u32> {
        if self.phase != RunnerPhase::Idle {
            return Err(DungeonError::RunnerActive);
        }
        let gained = perform_prestige(&mut self.state)?;
        self.enemies.clear();
        self.current_event = None;
        self.is_boss_wave = false;
        self.combat_log.clear();
        self.last_reward = None;
        self.refresh_all_heroes();
        for hero in self.state.heroes.iter_mut() {
            hero.full_heal();
        }
        self.bus.notify(
            NotificationKind::Success,
            &format!("Prestige complete: +{gained} sigils"),
        );
        self.publish();
        Ok(gained)
    }

    pub fn apply_offline_progress(&mut self, elapsed_ms: u64) -> OfflineReport {
        let report = offline::apply_offline_progress(&mut self.state, elapsed_ms);
        if report.gold_gained > 0 {
            self.bus.notify(
                NotificationKind::Gold,
                &format!("Welcome back! +{} gold", report.gold_gained),
            );
        }
        report
    }
}
