//! MasteryCategory - Sorted milestones and their resolution at a level

use crate::effect::EffectSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Effect type that accumulates across milestones instead of competing
pub const UNLOCK_DIFFICULTY: &str = "unlock_difficulty";

/// One reward granted by a milestone
///
/// Fields other than `type` and `value` are kept in `params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneEffect {
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(default)]
    pub value: f64,
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl MilestoneEffect {
    pub fn new(effect_type: impl Into<String>, value: f64) -> Self {
        MilestoneEffect {
            effect_type: effect_type.into(),
            value,
            params: serde_json::Map::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Engine effect for rewards the interpreter can process directly,
    /// with `value` as the amount
    pub fn to_effect_spec(&self) -> Option<EffectSpec> {
        let mut object = self.params.clone();
        object.insert("type".to_string(), self.effect_type.clone().into());
        object.insert("amount".to_string(), self.value.into());
        let spec: EffectSpec = serde_json::from_value(serde_json::Value::Object(object)).ok()?;
        spec.effect_type().map(|_| spec)
    }
}

/// A level threshold and the effects it unlocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub level: u32,
    /// Multiply every effect value by the queried level
    #[serde(default)]
    pub scaling: bool,
    #[serde(default)]
    pub effects: Vec<MilestoneEffect>,
}

fn default_max_level() -> u32 {
    99
}

#[derive(Deserialize)]
struct MasteryCategoryConfig {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_max_level")]
    max_level: u32,
    #[serde(default)]
    milestones: Vec<Milestone>,
}

/// A mastery track with milestones kept sorted by level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MasteryCategoryConfig")]
pub struct MasteryCategory {
    pub id: String,
    pub name: String,
    pub max_level: u32,
    milestones: Vec<Milestone>,
}

impl From<MasteryCategoryConfig> for MasteryCategory {
    fn from(config: MasteryCategoryConfig) -> Self {
        let mut category = MasteryCategory::new(config.id, config.name);
        category.max_level = config.max_level;
        for milestone in config.milestones {
            category.add_milestone(milestone);
        }
        category
    }
}

impl MasteryCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        MasteryCategory {
            id: id.into(),
            name: name.into(),
            max_level: default_max_level(),
            milestones: Vec::new(),
        }
    }

    /// Insert keeping ascending level order; equal levels keep insertion order
    pub fn add_milestone(&mut self, milestone: Milestone) {
        let at = self.milestones.partition_point(|m| m.level <= milestone.level);
        self.milestones.insert(at, milestone);
    }

    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.add_milestone(milestone);
        self
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    fn achieved_count(&self, level: u32) -> usize {
        self.milestones.partition_point(|m| m.level <= level)
    }

    /// Milestones with `level <= level`
    pub fn achieved_milestones(&self, level: u32) -> &[Milestone] {
        &self.milestones[..self.achieved_count(level)]
    }

    /// First milestone above `level`
    pub fn next_milestone(&self, level: u32) -> Option<&Milestone> {
        self.milestones.get(self.achieved_count(level))
    }

    /// Effects active at `level` (capped at `max_level`)
    ///
    /// Scaling milestones contribute every effect with `value × level`,
    /// where `level` is the capped level rather than the one passed in: a
    /// character past `max_level` scales as if exactly at it.
    /// `unlock_difficulty` effects are all kept. Any other effect type keeps
    /// only the entry from the highest achieved milestone.
    pub fn effects_at_level(&self, level: u32) -> Vec<MilestoneEffect> {
        let level = level.min(self.max_level);
        let mut effects: Vec<MilestoneEffect> = Vec::new();
        let mut winners: HashMap<&str, usize> = HashMap::new();

        for milestone in self.achieved_milestones(level) {
            for effect in &milestone.effects {
                if milestone.scaling {
                    let mut scaled = effect.clone();
                    scaled.value *= f64::from(level);
                    effects.push(scaled);
                } else if effect.effect_type == UNLOCK_DIFFICULTY {
                    effects.push(effect.clone());
                } else if let Some(&index) = winners.get(effect.effect_type.as_str()) {
                    effects[index] = effect.clone();
                } else {
                    winners.insert(&effect.effect_type, effects.len());
                    effects.push(effect.clone());
                }
            }
        }

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(level: u32, effects: Vec<MilestoneEffect>) -> Milestone {
        Milestone {
            level,
            scaling: false,
            effects,
        }
    }

    #[test]
    fn test_highest_tier_wins() {
        let category = MasteryCategory::new("combat", "Combat")
            .with_milestone(milestone(10, vec![MilestoneEffect::new("crit", 5.0)]))
            .with_milestone(milestone(20, vec![MilestoneEffect::new("crit", 8.0)]));

        let effects = category.effects_at_level(25);
        assert_eq!(effects, vec![MilestoneEffect::new("crit", 8.0)]);

        let effects = category.effects_at_level(15);
        assert_eq!(effects, vec![MilestoneEffect::new("crit", 5.0)]);
        assert!(category.effects_at_level(9).is_empty());
    }

    #[test]
    fn test_scaling_milestone_multiplies_by_level() {
        let category = MasteryCategory::new("mining", "Mining").with_milestone(Milestone {
            level: 1,
            scaling: true,
            effects: vec![MilestoneEffect::new("bonus", 2.0)],
        });
        let effects = category.effects_at_level(30);
        assert_eq!(effects.len(), 1);
        assert!((effects[0].value - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scaling_capped_at_max_level() {
        let mut category = MasteryCategory::new("mining", "Mining").with_milestone(Milestone {
            level: 1,
            scaling: true,
            effects: vec![MilestoneEffect::new("bonus", 1.0)],
        });
        category.max_level = 50;
        assert!((category.effects_at_level(80)[0].value - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unlocks_accumulate() {
        let category = MasteryCategory::new("dungeon", "Dungeon")
            .with_milestone(milestone(
                5,
                vec![MilestoneEffect::new(UNLOCK_DIFFICULTY, 0.0).with_param("difficulty", "heroic")],
            ))
            .with_milestone(milestone(
                15,
                vec![MilestoneEffect::new(UNLOCK_DIFFICULTY, 0.0).with_param("difficulty", "mythic")],
            ));
        assert_eq!(category.effects_at_level(20).len(), 2);
    }

    #[test]
    fn test_milestones_sorted_on_load() {
        let category: MasteryCategory = toml::from_str(
            r#"
id = "woodcutting"

[[milestones]]
level = 20
effects = [{ type = "speed", value = 10 }]

[[milestones]]
level = 5
effects = [{ type = "speed", value = 4 }]
"#,
        )
        .unwrap();

        assert_eq!(category.max_level, 99);
        let levels: Vec<u32> = category.milestones().iter().map(|m| m.level).collect();
        assert_eq!(levels, vec![5, 20]);
    }

    #[test]
    fn test_next_and_achieved() {
        let category = MasteryCategory::new("combat", "Combat")
            .with_milestone(milestone(10, Vec::new()))
            .with_milestone(milestone(20, Vec::new()));

        assert_eq!(category.next_milestone(0).map(|m| m.level), Some(10));
        assert_eq!(category.next_milestone(10).map(|m| m.level), Some(20));
        assert!(category.next_milestone(20).is_none());
        assert_eq!(category.achieved_milestones(15).len(), 1);
        assert!(category.achieved_milestones(9).is_empty());
    }

    #[test]
    fn test_engine_effect_conversion() {
        let heal = MilestoneEffect::new("heal", 12.0).with_param("target", "self");
        let spec = heal.to_effect_spec().unwrap();
        assert_eq!(spec.amount_value(None), 12);

        assert!(MilestoneEffect::new("crit", 5.0).to_effect_spec().is_none());
    }
}
