//! EffectSpec - Declarative effect description attached to abilities, auras and rewards

use crate::scaling::{ScalableValue, StatLookup};
use crate::targeting::TargetSelector;
use crate::types::{LimitScope, PartyScope, StatId, Trigger};
use serde::{Deserialize, Serialize};

/// A single effect, discriminated by its `type` field
///
/// ```toml
/// type = "damage"
/// target = "front"
/// amount = { base = 5, scaling = { strength = 0.5 } }
/// limit = "turn"
/// times = 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    #[serde(flatten)]
    pub kind: EffectKind,

    /// Which character(s) the effect lands on
    #[serde(default)]
    pub target: TargetSelector,
    /// Party positional selectors run against; defaults per effect type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<PartyScope>,
    /// When the effect fires
    #[serde(default)]
    pub trigger: Trigger,

    // === Scalable values ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<ScalableValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacks: Option<ScalableValue>,

    // === Aura draw modifiers ===
    /// Remove stacks from the owning aura after firing
    #[serde(default)]
    pub consume: bool,
    /// Multiply the drawn amount by the aura's stack count
    #[serde(default)]
    pub stack: bool,
    /// Draw a per-stack share of the aura's stored amount
    #[serde(default)]
    pub split: bool,

    // === Usage limits ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<LimitScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<u32>,
}

/// Effect-specific payload, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    Damage {
        /// When set, `amount` is a percentage of the source's value of this stat
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stat: Option<StatId>,
    },
    Heal {
        #[serde(default)]
        mode: HealMode,
    },
    RestoreEnergy,
    /// Bring a dead character back at `amount` percent of max hitpoints
    Revive,
    ApplyBuff {
        id: String,
    },
    ApplyDebuff {
        id: String,
    },
    RemoveBuff {
        id: String,
    },
    RemoveDebuff {
        id: String,
    },
    StatModifier {
        stat: StatId,
        #[serde(default)]
        percent: bool,
    },
    GrantMaterial {
        id: String,
    },
    ConsumeMaterial {
        id: String,
    },
    /// Any `type` the engine does not know
    #[serde(other)]
    Unknown,
}

/// How a heal amount is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealMode {
    #[default]
    Flat,
    /// Percentage of missing hitpoints
    MissingHp,
    /// Percentage of maximum hitpoints
    MaxHpPercent,
}

/// Handler dispatch key; one per known [`EffectKind`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    Damage,
    Heal,
    RestoreEnergy,
    Revive,
    ApplyBuff,
    ApplyDebuff,
    RemoveBuff,
    RemoveDebuff,
    StatModifier,
    GrantMaterial,
    ConsumeMaterial,
}

impl EffectType {
    pub const ALL: [EffectType; 11] = [
        EffectType::Damage,
        EffectType::Heal,
        EffectType::RestoreEnergy,
        EffectType::Revive,
        EffectType::ApplyBuff,
        EffectType::ApplyDebuff,
        EffectType::RemoveBuff,
        EffectType::RemoveDebuff,
        EffectType::StatModifier,
        EffectType::GrantMaterial,
        EffectType::ConsumeMaterial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectType::Damage => "damage",
            EffectType::Heal => "heal",
            EffectType::RestoreEnergy => "restore_energy",
            EffectType::Revive => "revive",
            EffectType::ApplyBuff => "apply_buff",
            EffectType::ApplyDebuff => "apply_debuff",
            EffectType::RemoveBuff => "remove_buff",
            EffectType::RemoveDebuff => "remove_debuff",
            EffectType::StatModifier => "stat_modifier",
            EffectType::GrantMaterial => "grant_material",
            EffectType::ConsumeMaterial => "consume_material",
        }
    }

    /// Whether handlers of this type act on resolved characters
    pub fn targets_characters(self) -> bool {
        !matches!(
            self,
            EffectType::StatModifier | EffectType::GrantMaterial | EffectType::ConsumeMaterial
        )
    }

    /// Party used for positional selectors when the effect does not say
    pub fn default_party(self) -> PartyScope {
        match self {
            EffectType::Damage | EffectType::ApplyDebuff | EffectType::RemoveBuff => {
                PartyScope::Enemy
            }
            _ => PartyScope::Ally,
        }
    }
}

impl EffectKind {
    /// Dispatch key, or `None` for unknown types
    pub fn effect_type(&self) -> Option<EffectType> {
        Some(match self {
            EffectKind::Damage { .. } => EffectType::Damage,
            EffectKind::Heal { .. } => EffectType::Heal,
            EffectKind::RestoreEnergy => EffectType::RestoreEnergy,
            EffectKind::Revive => EffectType::Revive,
            EffectKind::ApplyBuff { .. } => EffectType::ApplyBuff,
            EffectKind::ApplyDebuff { .. } => EffectType::ApplyDebuff,
            EffectKind::RemoveBuff { .. } => EffectType::RemoveBuff,
            EffectKind::RemoveDebuff { .. } => EffectType::RemoveDebuff,
            EffectKind::StatModifier { .. } => EffectType::StatModifier,
            EffectKind::GrantMaterial { .. } => EffectType::GrantMaterial,
            EffectKind::ConsumeMaterial { .. } => EffectType::ConsumeMaterial,
            EffectKind::Unknown => return None,
        })
    }

    /// Referenced aura or material id
    pub fn reference_id(&self) -> Option<&str> {
        match self {
            EffectKind::ApplyBuff { id }
            | EffectKind::ApplyDebuff { id }
            | EffectKind::RemoveBuff { id }
            | EffectKind::RemoveDebuff { id }
            | EffectKind::GrantMaterial { id }
            | EffectKind::ConsumeMaterial { id } => Some(id),
            _ => None,
        }
    }

    /// Referenced stat id
    pub fn stat(&self) -> Option<&StatId> {
        match self {
            EffectKind::Damage { stat } => stat.as_ref(),
            EffectKind::StatModifier { stat, .. } => Some(stat),
            _ => None,
        }
    }
}

impl EffectSpec {
    /// An immediate effect with default targeting
    pub fn new(kind: EffectKind) -> Self {
        EffectSpec {
            kind,
            target: TargetSelector::default(),
            party: None,
            trigger: Trigger::default(),
            amount: None,
            stacks: None,
            consume: false,
            stack: false,
            split: false,
            limit: None,
            times: None,
        }
    }

    pub fn with_amount(mut self, amount: ScalableValue) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_stacks(mut self, stacks: ScalableValue) -> Self {
        self.stacks = Some(stacks);
        self
    }

    pub fn with_target(mut self, target: TargetSelector) -> Self {
        self.target = target;
        self
    }

    pub fn with_party(mut self, party: PartyScope) -> Self {
        self.party = Some(party);
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_limit(mut self, limit: LimitScope, times: u32) -> Self {
        self.limit = Some(limit);
        self.times = Some(times);
        self
    }

    pub fn effect_type(&self) -> Option<EffectType> {
        self.kind.effect_type()
    }

    /// Evaluated amount; 0 when the effect has none
    pub fn amount_value(&self, source: Option<&dyn StatLookup>) -> i64 {
        self.amount.as_ref().map_or(0, |a| a.evaluate(source))
    }

    /// Evaluated stack count; 1 when the effect has none
    pub fn stacks_value(&self, source: Option<&dyn StatLookup>) -> i64 {
        self.stacks.as_ref().map_or(1, |s| s.evaluate(source))
    }

    /// Party positional selectors resolve against
    pub fn party_scope(&self) -> PartyScope {
        match (self.party, self.effect_type()) {
            (Some(party), _) => party,
            (None, Some(effect_type)) => effect_type.default_party(),
            (None, None) => PartyScope::Ally,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_damage_effect_from_toml() {
        let effect: EffectSpec = toml::from_str(
            r#"
type = "damage"
target = "front"
amount = { base = 5, scaling = { strength = 0.5 } }
limit = "turn"
times = 2
"#,
        )
        .unwrap();

        assert_eq!(effect.kind, EffectKind::Damage { stat: None });
        assert_eq!(effect.target, TargetSelector::Front);
        assert_eq!(effect.limit, Some(LimitScope::Turn));
        assert_eq!(effect.times, Some(2));
        assert_eq!(effect.party_scope(), PartyScope::Enemy);
        assert!(effect.amount.as_ref().is_some_and(|a| a.is_scaling()));
    }

    #[test]
    fn test_parse_buff_effect_with_modifiers() {
        let effect: EffectSpec = serde_json::from_str(
            r#"{"type":"apply_buff","id":"might","stacks":2,"consume":true,"split":true}"#,
        )
        .unwrap();

        assert_eq!(effect.kind.reference_id(), Some("might"));
        assert_eq!(effect.stacks_value(None), 2);
        assert!(effect.consume && effect.split && !effect.stack);
        assert_eq!(effect.party_scope(), PartyScope::Ally);
    }

    #[test]
    fn test_unknown_type_parses_as_unknown() {
        let effect: EffectSpec =
            serde_json::from_str(r#"{"type":"summon_dragon","amount":3}"#).unwrap();
        assert_eq!(effect.kind, EffectKind::Unknown);
        assert_eq!(effect.effect_type(), None);
    }

    #[test]
    fn test_heal_mode_parsing() {
        let effect: EffectSpec =
            serde_json::from_str(r#"{"type":"heal","mode":"missing_hp","amount":50}"#).unwrap();
        assert_eq!(effect.kind, EffectKind::Heal { mode: HealMode::MissingHp });
    }

    #[test]
    fn test_defaults_when_absent() {
        let effect = EffectSpec::new(EffectKind::RestoreEnergy);
        assert_eq!(effect.amount_value(None), 0);
        assert_eq!(effect.stacks_value(None), 1);
        assert_eq!(effect.trigger, Trigger::Immediate);
    }

    #[test]
    fn test_every_type_has_distinct_name() {
        let mut names: Vec<_> = EffectType::ALL.iter().map(|t| t.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), EffectType::ALL.len());
    }
}
