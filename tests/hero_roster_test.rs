//! Integration test: Hero roster operations through the runner
//!
//! Level-ups from wave XP, skill tree unlock/reset, awakening, dispatch and
//! fatigue, and equipment moves, each followed by a stat recompute.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use reincarn_dungeon::character::attributes::{GrowthRates, StatBlock};
use reincarn_dungeon::character::derived_stats::StatPipeline;
use reincarn_dungeon::character::hero::{Hero, HeroRole, HeroTemplate};
use reincarn_dungeon::character::skill_tree::{core_skill_tree, SkillNode, SkillNodeBonuses};
use reincarn_dungeon::core::config::DungeonConfig;
use reincarn_dungeon::core::error::DungeonError;
use reincarn_dungeon::core::game_state::GameState;
use reincarn_dungeon::dungeon::notify::NotificationKind;
use reincarn_dungeon::dungeon::runner::DungeonRunner;
use reincarn_dungeon::items::types::{EquipmentSlot, Item, ItemType, Rarity};
use std::cell::RefCell;
use std::rc::Rc;

fn solo_runner(hero: Hero) -> DungeonRunner {
    let mut state = GameState::empty();
    state.heroes = vec![hero];
    DungeonRunner::new(state)
        .with_config(DungeonConfig::without_events())
        .with_rng(ChaCha8Rng::seed_from_u64(21))
}

fn warrior_runner() -> DungeonRunner {
    solo_runner(Hero::from_template(&HeroTemplate::basic_warrior(), 1))
}

fn node(id: &str) -> SkillNode {
    core_skill_tree()
        .into_iter()
        .find(|n| n.id == id)
        .unwrap()
}

// =============================================================================
// Levels from wave XP
// =============================================================================

#[test]
fn test_wave_xp_levels_hero_and_notifies() {
    let template = HeroTemplate {
        id: "titan".to_string(),
        name: "Titan".to_string(),
        rarity: 1,
        role: HeroRole::Tank,
        base_stats: StatBlock::new(5000, 2000, 1000, 10, 5),
        growth_rates: GrowthRates::default(),
    };
    let mut runner = solo_runner(Hero::from_template(&template, 1));
    let level_ups = Rc::new(RefCell::new(Vec::new()));
    let sink = level_ups.clone();
    runner.set_notification(move |kind, message| {
        if kind == NotificationKind::LevelUp {
            sink.borrow_mut().push(message.to_string());
        }
    });

    runner.start();
    // Waves 1 and 2 clear at 1000 and 3000; 103 xp each
    runner.advance(3000);

    let hero = &runner.state().heroes[0];
    assert_eq!(runner.state().wave(), 3);
    assert_eq!(hero.level, 2);
    assert_eq!(hero.xp, 6);
    assert_eq!(hero.skill_points, 1);
    assert_eq!(runner.state().stats.highest_hero_level, 2);
    assert_eq!(*level_ups.borrow(), vec!["Titan reached level 2".to_string()]);
}

// =============================================================================
// Skill tree
// =============================================================================

#[test]
fn test_skill_unlock_and_reset_recompute_stats() {
    let mut runner = warrior_runner()
        .with_pipeline(StatPipeline::new(SkillNodeBonuses::from_nodes(&core_skill_tree())));
    let id = runner.state().heroes[0].id;
    runner.state_mut().heroes[0].skill_points = 3;
    runner.state_mut().add_gold(300);

    assert_eq!(
        runner.unlock_skill_node(id, &node("edge_2")),
        Err(DungeonError::MissingPrerequisite {
            required: "edge_1".to_string()
        })
    );
    runner.unlock_skill_node(id, &node("edge_1")).unwrap();
    assert_eq!(runner.state().heroes[0].current_stats.atk, 15);
    runner.unlock_skill_node(id, &node("edge_2")).unwrap();
    // (12 + 3) x 1.1
    assert_eq!(runner.state().heroes[0].current_stats.atk, 16);
    assert_eq!(runner.state().heroes[0].skill_points, 0);
    assert_eq!(runner.state().gold, 50);
    assert_eq!(
        runner.unlock_skill_node(id, &node("edge_1")),
        Err(DungeonError::SkillAlreadyUnlocked)
    );

    assert_eq!(
        runner.reset_skill_tree(id),
        Err(DungeonError::NotEnoughGold {
            required: 500,
            available: 50
        })
    );
    runner.state_mut().add_gold(450);
    assert_eq!(runner.reset_skill_tree(id), Ok(2));
    let hero = &runner.state().heroes[0];
    assert_eq!(hero.skill_points, 2);
    assert!(hero.unlocked_skill_nodes.is_empty());
    assert_eq!(hero.current_stats.atk, 12);
    assert_eq!(runner.state().gold, 0);
}

// =============================================================================
// Awakening and dispatch
// =============================================================================

#[test]
fn test_awaken_hero_scales_stats() {
    let mut runner = warrior_runner();
    let id = runner.state().heroes[0].id;
    assert_eq!(runner.awaken_hero(id), Ok(1));
    let stats = runner.state().heroes[0].current_stats;
    assert_eq!((stats.hp, stats.atk), (132, 13));
    assert_eq!(runner.state().heroes[0].max_level(), 110);
    assert!(matches!(
        runner.awaken_hero(uuid::Uuid::nil()),
        Err(DungeonError::HeroNotFound { .. })
    ));
}

#[test]
fn test_failed_dispatch_fatigues_until_clock_passes() {
    let mut runner = warrior_runner();
    let id = runner.state().heroes[0].id;

    runner.send_on_dispatch(id, "data_mine", 60_000).unwrap();
    assert_eq!(
        runner.send_on_dispatch(id, "data_mine", 60_000),
        Err(DungeonError::AlreadyOnDispatch)
    );
    assert!(!runner.state().heroes[0].can_fight());

    runner.return_from_dispatch(id, false).unwrap();
    assert_eq!(
        runner.state().heroes[0].current_stats,
        StatBlock::new(96, 9, 6, 6, 4)
    );
    assert_eq!(
        runner.send_on_dispatch(id, "data_mine", 60_000),
        Err(DungeonError::Fatigued {
            minutes_remaining: 60
        })
    );

    // An hour of idle time; the next start recomputes without fatigue
    runner.advance(60 * 60 * 1000);
    runner.start();
    let hero = &runner.state().heroes[0];
    assert!(!hero.fatigued);
    assert_eq!(hero.current_stats, StatBlock::new(120, 12, 8, 8, 5));
    assert_eq!(hero.current_hp, 120);
}

#[test]
fn test_successful_dispatch_leaves_no_fatigue() {
    let mut runner = warrior_runner();
    let id = runner.state().heroes[0].id;
    runner.send_on_dispatch(id, "scout", 1_000).unwrap();
    runner.return_from_dispatch(id, true).unwrap();
    assert!(!runner.state().heroes[0].fatigued);
    assert!(runner.send_on_dispatch(id, "scout", 1_000).is_ok());
}

// =============================================================================
// Equipment
// =============================================================================

#[test]
fn test_unequip_into_full_inventory_keeps_item_equipped() {
    let mut runner = warrior_runner().with_config(DungeonConfig {
        inventory_slots: 1,
        ..DungeonConfig::without_events()
    });
    let id = runner.state().heroes[0].id;
    let blade = Item::new("Blade", ItemType::Weapon, Rarity::Rare, 3).with_bonus("atk", 6.0);
    let blade_id = blade.id;
    runner.state_mut().store_item(blade).unwrap();
    runner.equip_item(id, blade_id).unwrap();
    runner
        .state_mut()
        .store_item(Item::new("Filler", ItemType::Armor, Rarity::Common, 1))
        .unwrap();

    assert_eq!(
        runner.unequip_item(id, EquipmentSlot::Weapon),
        Err(DungeonError::InventoryFull)
    );
    let hero = &runner.state().heroes[0];
    assert_eq!(
        hero.equipment.get(EquipmentSlot::Weapon).map(|i| i.id),
        Some(blade_id)
    );
    assert_eq!(hero.current_stats.atk, 18);
}

#[test]
fn test_equip_missing_item_or_hero() {
    let mut runner = warrior_runner();
    let id = runner.state().heroes[0].id;
    assert!(matches!(
        runner.equip_item(id, uuid::Uuid::nil()),
        Err(DungeonError::ItemNotFound { .. })
    ));
    assert!(matches!(
        runner.equip_item(uuid::Uuid::nil(), uuid::Uuid::nil()),
        Err(DungeonError::HeroNotFound { .. })
    ));
}

#[test]
fn test_recruit_hero_joins_party_at_full_health() {
    let mut runner = warrior_runner();
    let id = runner.add_hero("basic_support", 3).unwrap();
    let hero = runner.state().find_hero(id).unwrap();
    // 90 + 9 x 2 x 0.8
    assert_eq!(hero.current_stats.hp, 104);
    assert_eq!(hero.current_hp, 104);
    assert_eq!(hero.skill_points, 2);
    assert_eq!(runner.state().heroes.len(), 2);
}
