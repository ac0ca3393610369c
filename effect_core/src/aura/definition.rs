//! AuraDefinition - Immutable buff/debuff template

use crate::effect::EffectSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How re-applied stacks merge into an existing instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackPolicy {
    /// Add new stacks to existing
    Stack,
    /// Overwrite stacks with the new count
    Refresh,
    /// Keep whichever count is higher
    #[default]
    Keep,
}

/// How a re-applied amount merges into an existing instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountPolicy {
    Accumulate,
    Overwrite,
    #[default]
    Keep,
}

/// Rejected aura definitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuraDefinitionError {
    #[error("aura has an empty id")]
    EmptyId,

    #[error("aura '{0}' sets both `stack` and `refresh`")]
    ConflictingStackPolicy(String),

    #[error("aura '{0}' sets both `accumulate` and `overwrite`")]
    ConflictingAmountPolicy(String),
}

/// Aura definition as written in content files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraDefinitionConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: Vec<EffectSpec>,

    // Stacking flags
    #[serde(default)]
    pub combine: bool,
    #[serde(default)]
    pub stack: bool,
    #[serde(default)]
    pub refresh: bool,
    #[serde(default)]
    pub accumulate: bool,
    #[serde(default)]
    pub overwrite: bool,
}

/// Validated buff/debuff template
#[derive(Debug, Clone, PartialEq)]
pub struct AuraDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Applied in declared order
    pub effects: Vec<EffectSpec>,
    /// Merge with an existing instance regardless of who applied it
    pub combine: bool,
    pub stack_policy: StackPolicy,
    pub amount_policy: AmountPolicy,
}

impl AuraDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        AuraDefinition {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            effects: Vec::new(),
            combine: false,
            stack_policy: StackPolicy::default(),
            amount_policy: AmountPolicy::default(),
        }
    }

    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_stack_policy(mut self, policy: StackPolicy) -> Self {
        self.stack_policy = policy;
        self
    }

    pub fn with_amount_policy(mut self, policy: AmountPolicy) -> Self {
        self.amount_policy = policy;
        self
    }

    pub fn combined(mut self) -> Self {
        self.combine = true;
        self
    }
}

impl TryFrom<AuraDefinitionConfig> for AuraDefinition {
    type Error = AuraDefinitionError;

    fn try_from(config: AuraDefinitionConfig) -> Result<Self, Self::Error> {
        if config.id.trim().is_empty() {
            return Err(AuraDefinitionError::EmptyId);
        }

        let stack_policy = match (config.stack, config.refresh) {
            (true, true) => return Err(AuraDefinitionError::ConflictingStackPolicy(config.id)),
            (true, false) => StackPolicy::Stack,
            (false, true) => StackPolicy::Refresh,
            (false, false) => StackPolicy::Keep,
        };
        let amount_policy = match (config.accumulate, config.overwrite) {
            (true, true) => return Err(AuraDefinitionError::ConflictingAmountPolicy(config.id)),
            (true, false) => AmountPolicy::Accumulate,
            (false, true) => AmountPolicy::Overwrite,
            (false, false) => AmountPolicy::Keep,
        };

        let name = if config.name.is_empty() {
            config.id.clone()
        } else {
            config.name
        };

        Ok(AuraDefinition {
            id: config.id,
            name,
            description: config.description,
            effects: config.effects,
            combine: config.combine,
            stack_policy,
            amount_policy,
        })
    }
}
