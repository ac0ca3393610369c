//! EffectHandlerRegistry - Dispatch from effect type to handler

use super::{handlers, AppliedEffect, EffectContext, EffectOutcome, EffectSpec, EffectType};
use crate::types::CharacterRef;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Applies one effect type to already-resolved targets
pub trait EffectHandler {
    fn apply(
        &self,
        effect: &EffectSpec,
        targets: &[CharacterRef],
        ctx: &mut EffectContext<'_>,
    ) -> Vec<AppliedEffect>;
}

impl<F> EffectHandler for F
where
    F: Fn(&EffectSpec, &[CharacterRef], &mut EffectContext<'_>) -> Vec<AppliedEffect>,
{
    fn apply(
        &self,
        effect: &EffectSpec,
        targets: &[CharacterRef],
        ctx: &mut EffectContext<'_>,
    ) -> Vec<AppliedEffect> {
        self(effect, targets, ctx)
    }
}

/// Handler table keyed by [`EffectType`]
pub struct EffectHandlerRegistry {
    handlers: HashMap<EffectType, Box<dyn EffectHandler>>,
}

impl Default for EffectHandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EffectHandlerRegistry {
    /// An empty registry; every effect is a no-op until registered
    pub fn new() -> Self {
        EffectHandlerRegistry {
            handlers: HashMap::new(),
        }
    }

    /// A registry with every built-in handler
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for effect_type in EffectType::ALL {
            registry.register(effect_type, handlers::builtin(effect_type));
        }
        registry
    }

    /// Register (or replace) the handler for an effect type
    pub fn register<H: EffectHandler + 'static>(&mut self, effect_type: EffectType, handler: H) {
        self.handlers.insert(effect_type, Box::new(handler));
    }

    pub fn has_handler(&self, effect_type: EffectType) -> bool {
        self.handlers.contains_key(&effect_type)
    }

    /// Process one effect
    ///
    /// Returns `None` when the effect type is unknown or has no handler.
    /// An effect whose limit is spent returns a blocked outcome without
    /// resolving targets.
    pub fn process(&self, effect: &EffectSpec, ctx: &mut EffectContext<'_>) -> Option<EffectOutcome> {
        let Some(effect_type) = effect.effect_type() else {
            warn!("unknown effect type, skipping");
            return None;
        };
        let Some(handler) = self.handlers.get(&effect_type) else {
            warn!(effect = effect_type.as_str(), "no handler registered, skipping");
            return None;
        };

        let source = ctx.source_key();
        if let Some(limits) = ctx.limits.as_deref() {
            if !limits.can_trigger(effect, &source) {
                debug!(effect = effect_type.as_str(), %source, "limit reached");
                return Some(EffectOutcome::blocked(effect_type));
            }
        }

        let targets = if effect_type.targets_characters() {
            ctx.resolve_targets(effect)
        } else {
            Vec::new()
        };
        let applied = handler.apply(effect, &targets, ctx);

        if let Some(limits) = ctx.limits.as_deref_mut() {
            limits.record(effect, &source);
        }

        Some(EffectOutcome::new(effect_type, targets, applied))
    }

    /// Process effects in declared order, skipping unknown ones
    pub fn process_all<'e>(
        &self,
        effects: impl IntoIterator<Item = &'e EffectSpec>,
        ctx: &mut EffectContext<'_>,
    ) -> Vec<EffectOutcome> {
        effects
            .into_iter()
            .filter_map(|effect| self.process(effect, ctx))
            .collect()
    }
}
