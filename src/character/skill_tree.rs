//! Per-hero skill trees: node catalog, unlock/reset rules, and the stat hook
//! the stat pipeline calls after global modifiers.

use super::attributes::{apply_bonuses, bonuses, StatBlock, StatBonuses};
use super::hero::Hero;
use crate::core::constants::SKILL_RESET_GOLD_COST;
use crate::core::error::{DungeonError, DungeonResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source of skill-tree stat bonuses.
///
/// Called on every stat recompute, including for heroes with no unlocked
/// nodes.
pub trait SkillTreeBonuses {
    fn apply(&self, unlocked_nodes: &[String], stats: &mut StatBlock);
}

/// Skill trees grant no stats.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSkillBonuses;

impl SkillTreeBonuses for NoSkillBonuses {
    fn apply(&self, _unlocked_nodes: &[String], _stats: &mut StatBlock) {}
}

/// Looks up each unlocked node's bonus map. Unknown node ids grant nothing.
#[derive(Debug, Clone, Default)]
pub struct SkillNodeBonuses {
    nodes: HashMap<String, StatBonuses>,
}

impl SkillNodeBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: &[SkillNode]) -> Self {
        Self {
            nodes: nodes
                .iter()
                .map(|node| (node.id.clone(), node.bonuses.clone()))
                .collect(),
        }
    }

    pub fn insert(&mut self, node_id: impl Into<String>, bonuses: StatBonuses) {
        self.nodes.insert(node_id.into(), bonuses);
    }
}

impl SkillTreeBonuses for SkillNodeBonuses {
    fn apply(&self, unlocked_nodes: &[String], stats: &mut StatBlock) {
        for node_id in unlocked_nodes {
            if let Some(node_bonuses) = self.nodes.get(node_id) {
                apply_bonuses(stats, node_bonuses, false);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillNode {
    pub id: String,
    pub name: String,
    /// Node ids that must already be unlocked
    pub requires: Vec<String>,
    pub skill_point_cost: u32,
    pub gold_cost: u64,
    pub bonuses: StatBonuses,
}

impl SkillNode {
    pub fn new(id: &str, name: &str, skill_point_cost: u32, bonuses: StatBonuses) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            requires: Vec::new(),
            skill_point_cost,
            gold_cost: 0,
            bonuses,
        }
    }

    pub fn requires(mut self, node_id: &str) -> Self {
        self.requires.push(node_id.to_string());
        self
    }

    pub fn gold_cost(mut self, gold: u64) -> Self {
        self.gold_cost = gold;
        self
    }
}

/// Small shared tree every hero can learn from.
pub fn core_skill_tree() -> Vec<SkillNode> {
    vec![
        SkillNode::new("vitality_1", "Vitality I", 1, bonuses([("hpPercent", 0.05)])),
        SkillNode::new("vitality_2", "Vitality II", 2, bonuses([("hpPercent", 0.10)]))
            .requires("vitality_1"),
        SkillNode::new("edge_1", "Keen Edge I", 1, bonuses([("atk", 3.0)])),
        SkillNode::new("edge_2", "Keen Edge II", 2, bonuses([("atkPercent", 0.10)]))
            .requires("edge_1")
            .gold_cost(250),
        SkillNode::new("bulwark", "Bulwark", 3, bonuses([("def", 5.0), ("defPercent", 0.10)]))
            .requires("vitality_1")
            .requires("edge_1"),
    ]
}

/// Unlocks `node` for `hero`, spending skill points and gold.
///
/// Checks run in order: already unlocked, prerequisites, skill points, gold.
/// Nothing is spent unless every check passes. Stats are not recomputed here.
pub fn unlock_skill_node(hero: &mut Hero, node: &SkillNode, gold: &mut u64) -> DungeonResult<()> {
    if hero.unlocked_skill_nodes.contains(&node.id) {
        return Err(DungeonError::SkillAlreadyUnlocked);
    }
    if let Some(missing) = node
        .requires
        .iter()
        .find(|required| !hero.unlocked_skill_nodes.contains(required))
    {
        return Err(DungeonError::MissingPrerequisite {
            required: missing.clone(),
        });
    }
    if hero.skill_points < node.skill_point_cost {
        return Err(DungeonError::NotEnoughSkillPoints {
            required: node.skill_point_cost,
            available: hero.skill_points,
        });
    }
    if *gold < node.gold_cost {
        return Err(DungeonError::NotEnoughGold {
            required: node.gold_cost,
            available: *gold,
        });
    }

    hero.skill_points -= node.skill_point_cost;
    *gold -= node.gold_cost;
    hero.unlocked_skill_nodes.push(node.id.clone());
    Ok(())
}

/// Clears every unlocked node for a flat gold fee, refunding one point per
/// node. Returns the refunded points.
pub fn reset_skill_tree(hero: &mut Hero, gold: &mut u64) -> DungeonResult<u32> {
    if hero.unlocked_skill_nodes.is_empty() {
        return Err(DungeonError::NoSkillsToReset);
    }
    if *gold < SKILL_RESET_GOLD_COST {
        return Err(DungeonError::NotEnoughGold {
            required: SKILL_RESET_GOLD_COST,
            available: *gold,
        });
    }

    let refund = hero.unlocked_skill_nodes.len() as u32;
    *gold -= SKILL_RESET_GOLD_COST;
    hero.skill_points += refund;
    hero.unlocked_skill_nodes.clear();
    Ok(refund)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::hero::HeroTemplate;

    fn hero_with_points(points: u32) -> Hero {
        let mut hero = Hero::from_template(&HeroTemplate::basic_warrior(), 1);
        hero.skill_points = points;
        hero
    }

    fn node(id: &str) -> SkillNode {
        core_skill_tree()
            .into_iter()
            .find(|n| n.id == id)
            .unwrap()
    }

    #[test]
    fn test_unlock_spends_points() {
        let mut hero = hero_with_points(3);
        let mut gold = 0;
        unlock_skill_node(&mut hero, &node("edge_1"), &mut gold).unwrap();
        assert_eq!(hero.skill_points, 2);
        assert_eq!(hero.unlocked_skill_nodes, vec!["edge_1".to_string()]);
    }

    #[test]
    fn test_unlock_twice_fails() {
        let mut hero = hero_with_points(3);
        let mut gold = 0;
        unlock_skill_node(&mut hero, &node("edge_1"), &mut gold).unwrap();
        assert_eq!(
            unlock_skill_node(&mut hero, &node("edge_1"), &mut gold),
            Err(DungeonError::SkillAlreadyUnlocked)
        );
        assert_eq!(hero.skill_points, 2);
    }

    #[test]
    fn test_prerequisite_enforced() {
        let mut hero = hero_with_points(10);
        let mut gold = 1000;
        assert_eq!(
            unlock_skill_node(&mut hero, &node("vitality_2"), &mut gold),
            Err(DungeonError::MissingPrerequisite {
                required: "vitality_1".to_string()
            })
        );
        assert_eq!(hero.skill_points, 10);
        assert!(hero.unlocked_skill_nodes.is_empty());
    }

    #[test]
    fn test_not_enough_points_or_gold() {
        let mut hero = hero_with_points(0);
        let mut gold = 0;
        assert_eq!(
            unlock_skill_node(&mut hero, &node("edge_1"), &mut gold),
            Err(DungeonError::NotEnoughSkillPoints {
                required: 1,
                available: 0
            })
        );

        let mut hero = hero_with_points(5);
        unlock_skill_node(&mut hero, &node("edge_1"), &mut gold).unwrap();
        let mut gold = 100;
        assert_eq!(
            unlock_skill_node(&mut hero, &node("edge_2"), &mut gold),
            Err(DungeonError::NotEnoughGold {
                required: 250,
                available: 100
            })
        );
        assert_eq!(gold, 100);
        assert_eq!(hero.skill_points, 4);
    }

    #[test]
    fn test_reset_refunds_one_point_per_node() {
        let mut hero = hero_with_points(5);
        let mut gold = 600;
        unlock_skill_node(&mut hero, &node("vitality_1"), &mut gold).unwrap();
        unlock_skill_node(&mut hero, &node("vitality_2"), &mut gold).unwrap();
        assert_eq!(hero.skill_points, 2);

        let refunded = reset_skill_tree(&mut hero, &mut gold).unwrap();
        assert_eq!(refunded, 2);
        assert_eq!(hero.skill_points, 4);
        assert_eq!(gold, 100);
        assert!(hero.unlocked_skill_nodes.is_empty());
    }

    #[test]
    fn test_reset_errors() {
        let mut hero = hero_with_points(1);
        let mut gold = 10_000;
        assert_eq!(
            reset_skill_tree(&mut hero, &mut gold),
            Err(DungeonError::NoSkillsToReset)
        );

        unlock_skill_node(&mut hero, &node("edge_1"), &mut gold).unwrap();
        let mut poor = 499;
        assert!(matches!(
            reset_skill_tree(&mut hero, &mut poor),
            Err(DungeonError::NotEnoughGold { required: 500, .. })
        ));
    }

    #[test]
    fn test_node_bonuses_apply_only_when_unlocked() {
        let strategy = SkillNodeBonuses::from_nodes(&core_skill_tree());
        let mut stats = StatBlock::new(100, 10, 10, 10, 10);
        strategy.apply(&[], &mut stats);
        assert_eq!(stats, StatBlock::new(100, 10, 10, 10, 10));

        strategy.apply(
            &["edge_1".to_string(), "unknown".to_string()],
            &mut stats,
        );
        assert_eq!(stats.atk, 13);
    }

    #[test]
    fn test_no_skill_bonuses_is_noop() {
        let mut stats = StatBlock::new(100, 10, 10, 10, 10);
        NoSkillBonuses.apply(&["edge_1".to_string()], &mut stats);
        assert_eq!(stats, StatBlock::new(100, 10, 10, 10, 10));
    }
}
