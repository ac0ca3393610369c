//! Prelude module for convenient imports
//!
//! ```rust
//! use effect_core::prelude::*;
//! ```

// Core types
pub use crate::stat_block::StatBlock;
pub use crate::types::{CharacterRef, LimitScope, PartyScope, Position, Side, StatId, Trigger};

// Characters
pub use crate::character::{Character, Encounter, Party};

// Effects
pub use crate::effect::{
    trigger_auras, CombatLog, EffectContext, EffectHandlerRegistry, EffectKind, EffectOutcome,
    EffectSpec, MaterialStash, Stash,
};
pub use crate::limits::EffectLimitTracker;
pub use crate::scaling::ScalableValue;
pub use crate::targeting::TargetSelector;

// Auras
pub use crate::aura::{AuraApplication, AuraDefinition, AuraRegistry};

// Mastery
pub use crate::mastery::{MasteryAction, MasteryEffectCache, MasteryRegistry};

// Config
pub use crate::config::{default_content, default_mastery};
pub use crate::content::ContentRegistry;
pub use crate::weighted::{WeightedEntry, WeightedTable};
