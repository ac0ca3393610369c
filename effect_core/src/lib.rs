//! effect_core - Data-driven combat effect engine
//!
//! This library provides:
//! - StatBlock: Stats aggregated from base, gear and aura sources
//! - ScalableValue: Base-plus-scaling amounts with a readable breakdown
//! - Target resolution: Selector keywords with positional fallback
//! - EffectHandlerRegistry: Dispatch and built-in handlers for effect types
//! - Auras: Stackable buffs/debuffs with merge, split and consume rules
//! - Mastery: Level-gated milestone effects with cached lookups
//! - EffectLimitTracker, EffectCache and WeightedTable support types

pub mod aura;
pub mod cache;
pub mod character;
pub mod config;
pub mod content;
pub mod effect;
pub mod limits;
pub mod mastery;
pub mod prelude;
pub mod scaling;
pub mod source;
pub mod stat_block;
pub mod targeting;
pub mod types;
pub mod weighted;

// Re-export core types for convenience
pub use aura::{AuraApplication, AuraDefinition, AuraInstance, AuraList, AuraRegistry, SavedAura};
pub use cache::EffectCache;
pub use character::{Character, DamageTaken, Encounter, Party};
pub use config::{default_content, default_mastery, ConfigError};
pub use content::ContentRegistry;
pub use effect::{
    trigger_auras, AppliedEffect, CombatLog, EffectContext, EffectHandlerRegistry, EffectKind,
    EffectOutcome, EffectSpec, EffectType, MaterialStash, Stash,
};
pub use limits::EffectLimitTracker;
pub use mastery::{MasteryAction, MasteryCategory, MasteryEffectCache, MasteryRegistry, Milestone, MilestoneEffect};
pub use scaling::{ScalableValue, ScalingBreakdown, StatLookup};
pub use source::{AuraSource, BaseStatsSource, GearSource, StatSource};
pub use stat_block::{StatAccumulator, StatBlock};
pub use targeting::{resolve, TargetSelector, TargetingContext};
pub use types::{CharacterRef, EquipmentSlot, LimitScope, PartyScope, Position, Side, StatId, Trigger};
pub use weighted::{WeightedEntry, WeightedTable};
