//! AuraInstance - A live application of an aura definition

use super::{AuraDefinition, AuraRegistry};
use crate::effect::EffectSpec;
use crate::types::CharacterRef;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Saved source index meaning "no source"
pub const NO_SOURCE: u8 = u8::MAX;

/// One aura slot on a character
///
/// Empty when `base` is `None`; active while `stacks > 0`. Dropping to zero
/// stacks through [`remove_stacks`](Self::remove_stacks) leaves `base` set
/// until the slot is reused.
#[derive(Debug, Clone, Default)]
pub struct AuraInstance {
    base: Option<Arc<AuraDefinition>>,
    pub stacks: u32,
    /// Stored potency, drawn from by `split` effects
    pub amount: Option<f64>,
    /// Who applied the aura; attribution only
    pub source: Option<CharacterRef>,
}

/// Persisted form: `(has_aura, definition_id, stacks, source_index)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAura {
    pub has_aura: bool,
    pub definition_id: String,
    pub stacks: u32,
    /// Arena index of the source, or [`NO_SOURCE`]
    pub source_index: u8,
}

impl AuraInstance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(&self) -> Option<&Arc<AuraDefinition>> {
        self.base.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.base.as_ref().map(|b| b.id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none()
    }

    pub fn is_active(&self) -> bool {
        self.base.is_some() && self.stacks > 0
    }

    /// Replace definition, stacks and amount
    pub fn set_aura(
        &mut self,
        definition: Arc<AuraDefinition>,
        stacks: u32,
        amount: Option<f64>,
        source: Option<CharacterRef>,
    ) {
        self.base = Some(definition);
        self.stacks = stacks;
        self.amount = amount;
        self.source = source;
    }

    /// Update stacks and amount, keeping the definition
    pub fn set(&mut self, stacks: u32, amount: Option<f64>) {
        if self.base.is_none() {
            return;
        }
        self.stacks = stacks;
        self.amount = amount;
    }

    /// Back to an empty slot
    pub fn remove(&mut self) {
        self.base = None;
        self.stacks = 0;
        self.amount = None;
        self.source = None;
    }

    /// Drop `count` stacks, stopping at zero
    pub fn remove_stacks(&mut self, count: u32) {
        self.stacks = self.stacks.saturating_sub(count);
    }

    /// Amount an effect delivers when fired from this instance
    ///
    /// `evaluated` is the effect's own amount. `split` hands out a per-stack
    /// share of the stored pool (rounded up) and lowers the pool, never
    /// below `evaluated × stacks`; `stack` multiplies by the stack count.
    pub fn draw(&mut self, effect: &EffectSpec, evaluated: i64) -> i64 {
        let stacks = f64::from(self.stacks);
        let base = evaluated as f64;

        if effect.split {
            if self.stacks == 0 {
                return 0;
            }
            let floor = base * stacks;
            let pool = self.amount.unwrap_or(floor);
            let share = (pool / stacks).ceil();
            self.amount = Some((pool - share).max(floor));
            return share as i64;
        }

        let value = self.amount.unwrap_or(base);
        if effect.stack {
            (value * stacks).floor() as i64
        } else {
            value.floor() as i64
        }
    }

    // === Persistence ===

    pub fn to_saved(&self) -> SavedAura {
        SavedAura {
            has_aura: self.base.is_some(),
            definition_id: self.id().unwrap_or_default().to_string(),
            stacks: self.stacks,
            source_index: self.source.map_or(NO_SOURCE, |s| s.index()),
        }
    }

    /// Decode a saved slot; a definition no longer registered yields an
    /// empty slot
    pub fn from_saved(saved: &SavedAura, registry: &AuraRegistry) -> Self {
        if !saved.has_aura {
            return Self::new();
        }
        match registry.get(&saved.definition_id) {
            Some(definition) => AuraInstance {
                base: Some(Arc::clone(definition)),
                stacks: saved.stacks,
                amount: None,
                source: CharacterRef::from_index(saved.source_index),
            },
            None => {
                warn!(aura = %saved.definition_id, "saved aura no longer defined, dropping");
                Self::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectKind, HealMode};
    use crate::types::Position;
    use proptest::prelude::*;

    fn might() -> Arc<AuraDefinition> {
        Arc::new(AuraDefinition::new("might", "Might"))
    }

    fn heal_effect() -> EffectSpec {
        EffectSpec::new(EffectKind::Heal { mode: HealMode::Flat })
    }

    #[test]
    fn test_lifecycle() {
        let mut aura = AuraInstance::new();
        assert!(aura.is_empty());

        aura.set_aura(might(), 3, Some(10.0), None);
        assert!(aura.is_active());

        aura.remove_stacks(5);
        assert_eq!(aura.stacks, 0);
        assert!(!aura.is_active());
        assert!(!aura.is_empty());

        aura.set_aura(might(), 1, None, None);
        aura.remove();
        assert!(aura.is_empty());
        assert_eq!(aura.stacks, 0);
    }

    #[test]
    fn test_set_requires_definition() {
        let mut aura = AuraInstance::new();
        aura.set(4, Some(1.0));
        assert_eq!(aura.stacks, 0);
    }

    #[test]
    fn test_draw_stack_multiplies() {
        let mut aura = AuraInstance::new();
        aura.set_aura(might(), 4, None, None);
        let mut effect = heal_effect();
        effect.stack = true;
        assert_eq!(aura.draw(&effect, 5), 20);
    }

    #[test]
    fn test_draw_plain_uses_stored_amount() {
        let mut aura = AuraInstance::new();
        aura.set_aura(might(), 4, Some(7.5), None);
        assert_eq!(aura.draw(&heal_effect(), 5), 7);
    }

    #[test]
    fn test_draw_split_rounds_up_and_drains() {
        let mut aura = AuraInstance::new();
        aura.set_aura(might(), 3, Some(100.0), None);
        let mut effect = heal_effect();
        effect.split = true;

        // ceil(100 / 3)
        assert_eq!(aura.draw(&effect, 10), 34);
        assert_eq!(aura.amount, Some(66.0));
        assert_eq!(aura.draw(&effect, 10), 22);
        assert_eq!(aura.amount, Some(44.0));
        assert_eq!(aura.draw(&effect, 10), 15);
        // Floored at base * stacks
        assert_eq!(aura.amount, Some(30.0));
    }

    #[test]
    fn test_saved_roundtrip() {
        let mut registry = AuraRegistry::new();
        registry.register_buff(AuraDefinition::new("might", "Might"));

        let mut aura = AuraInstance::new();
        let source = CharacterRef::hero(Position::Center);
        aura.set_aura(Arc::clone(registry.buff("might").unwrap()), 3, None, Some(source));

        let saved = aura.to_saved();
        assert_eq!(saved.source_index, 1);
        assert_eq!(saved.stacks, 3);

        let restored = AuraInstance::from_saved(&saved, &registry);
        assert_eq!(restored.id(), Some("might"));
        assert_eq!(restored.stacks, 3);
        assert_eq!(restored.source, Some(source));
    }

    #[test]
    fn test_saved_missing_definition_is_empty() {
        let saved = SavedAura {
            has_aura: true,
            definition_id: "retired_buff".to_string(),
            stacks: 2,
            source_index: NO_SOURCE,
        };
        let restored = AuraInstance::from_saved(&saved, &AuraRegistry::new());
        assert!(restored.is_empty());
        assert_eq!(restored.stacks, 0);
    }

    #[test]
    fn test_saved_empty_slot() {
        let saved = AuraInstance::new().to_saved();
        assert!(!saved.has_aura);
        assert_eq!(saved.source_index, NO_SOURCE);
    }

    proptest! {
        #[test]
        fn prop_split_never_drains_below_floor(
            base in 0i64..50,
            stacks in 1u32..10,
            bonus in 0.0f64..500.0,
            draws in 1usize..20,
        ) {
            let floor = base as f64 * f64::from(stacks);
            let mut aura = AuraInstance::new();
            aura.set_aura(might(), stacks, Some(floor + bonus), None);
            let mut effect = heal_effect();
            effect.split = true;

            for _ in 0..draws {
                aura.draw(&effect, base);
                let remaining = aura.amount.unwrap_or(0.0);
                prop_assert!(remaining >= floor - f64::EPSILON);
            }
        }
    }
}
