//! EffectOutcome - Structured record of what an effect did

use super::EffectType;
use crate::types::{CharacterRef, StatId};
use serde::{Deserialize, Serialize};

/// A single change made by a handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppliedEffect {
    Damage {
        target: CharacterRef,
        amount: i64,
        killing_blow: bool,
    },
    Heal {
        target: CharacterRef,
        amount: i64,
    },
    EnergyRestored {
        target: CharacterRef,
        amount: i64,
    },
    Revived {
        target: CharacterRef,
        hitpoints: i64,
    },
    AuraApplied {
        target: CharacterRef,
        aura_id: String,
        /// Total stacks after merging
        stacks: u32,
    },
    AuraRemoved {
        target: CharacterRef,
        aura_id: String,
    },
    /// Folded into stats by the aggregation pass, not applied directly
    StatModifier {
        stat: StatId,
        amount: i64,
        percent: bool,
    },
    MaterialGranted {
        id: String,
        amount: u32,
    },
    MaterialConsumed {
        id: String,
        amount: u32,
    },
}

/// Result of processing one effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectOutcome {
    pub effect_type: EffectType,
    /// Characters the selector resolved to
    pub targets: Vec<CharacterRef>,
    pub applied: Vec<AppliedEffect>,
    /// The effect's usage limit was already spent
    pub blocked_by_limit: bool,
}

impl EffectOutcome {
    pub fn new(effect_type: EffectType, targets: Vec<CharacterRef>, applied: Vec<AppliedEffect>) -> Self {
        EffectOutcome {
            effect_type,
            targets,
            applied,
            blocked_by_limit: false,
        }
    }

    pub fn blocked(effect_type: EffectType) -> Self {
        EffectOutcome {
            effect_type,
            targets: Vec::new(),
            applied: Vec::new(),
            blocked_by_limit: true,
        }
    }

    pub fn total_damage(&self) -> i64 {
        self.applied
            .iter()
            .map(|a| match a {
                AppliedEffect::Damage { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }

    pub fn total_healing(&self) -> i64 {
        self.applied
            .iter()
            .map(|a| match a {
                AppliedEffect::Heal { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }

    pub fn killing_blows(&self) -> usize {
        self.applied
            .iter()
            .filter(|a| matches!(a, AppliedEffect::Damage { killing_blow: true, .. }))
            .count()
    }

    /// Whether anything changed
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if self.blocked_by_limit {
            return format!("{} blocked by limit", self.effect_type.as_str());
        }

        let mut parts = Vec::new();

        let damage = self.total_damage();
        if damage > 0 {
            parts.push(format!("{} damage", damage));
        }

        let healing = self.total_healing();
        if healing > 0 {
            parts.push(format!("{} healed", healing));
        }

        for applied in &self.applied {
            match applied {
                AppliedEffect::EnergyRestored { amount, .. } => {
                    parts.push(format!("{} energy", amount));
                }
                AppliedEffect::Revived { hitpoints, .. } => {
                    parts.push(format!("revived at {} hp", hitpoints));
                }
                AppliedEffect::AuraApplied { aura_id, stacks, .. } => {
                    parts.push(format!("{} x{}", aura_id, stacks));
                }
                AppliedEffect::AuraRemoved { aura_id, .. } => {
                    parts.push(format!("{} removed", aura_id));
                }
                AppliedEffect::StatModifier { stat, amount, percent } => {
                    let suffix = if *percent { "%" } else { "" };
                    parts.push(format!("{:+}{} {}", amount, suffix, stat));
                }
                AppliedEffect::MaterialGranted { id, amount } => {
                    parts.push(format!("+{} {}", amount, id));
                }
                AppliedEffect::MaterialConsumed { id, amount } => {
                    parts.push(format!("-{} {}", amount, id));
                }
                AppliedEffect::Damage { .. } | AppliedEffect::Heal { .. } => {}
            }
        }

        if self.killing_blows() > 0 {
            parts.push("FATAL".to_string());
        }

        if parts.is_empty() {
            format!("{} had no effect", self.effect_type.as_str())
        } else {
            parts.join(", ")
        }
    }
}
