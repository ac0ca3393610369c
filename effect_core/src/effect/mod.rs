//! Effect interpreter - Specs, dispatch, handlers and outcomes

mod context;
mod handlers;
mod registry;
mod result;
mod spec;
mod trigger;

pub use context::{CombatLog, EffectContext, MaterialStash, Stash, StashError};
pub use registry::{EffectHandler, EffectHandlerRegistry};
pub use result::{AppliedEffect, EffectOutcome};
pub use spec::{EffectKind, EffectSpec, EffectType, HealMode};
pub use trigger::trigger_auras;
