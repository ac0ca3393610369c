//! AuraList - A character's aura slots and the effects they contribute

use super::{AmountPolicy, AuraDefinition, AuraInstance, AuraRegistry, SavedAura, StackPolicy};
use crate::effect::{EffectKind, EffectSpec};
use crate::types::{CharacterRef, StatId, Trigger};
use std::sync::Arc;
use tracing::debug;

/// A stat change contributed by an active aura
#[derive(Debug, Clone, PartialEq)]
pub struct AuraStatModifier {
    pub aura_id: String,
    pub stat: StatId,
    pub value: i64,
    pub percent: bool,
}

/// An aura effect queued for a trigger, with the definition it came from
#[derive(Debug, Clone)]
pub struct TriggeredEffect {
    pub slot: usize,
    pub definition: Arc<AuraDefinition>,
    pub effect: EffectSpec,
}

impl TriggeredEffect {
    /// Whether `instance` still holds the aura this effect was queued from
    pub fn is_from(&self, instance: &AuraInstance) -> bool {
        instance.is_active()
            && instance
                .base()
                .is_some_and(|base| Arc::ptr_eq(base, &self.definition))
    }
}

/// Stacks, amount and source for an aura being applied
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AuraApplication {
    pub stacks: u32,
    pub amount: Option<f64>,
    pub source: Option<CharacterRef>,
}

impl AuraApplication {
    pub fn new(stacks: u32) -> Self {
        AuraApplication {
            stacks,
            ..Default::default()
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_source(mut self, source: CharacterRef) -> Self {
        self.source = Some(source);
        self
    }
}

/// Aura slots owned by one character
///
/// Every mutation rebuilds the aggregated stat modifiers before returning.
#[derive(Debug, Clone, Default)]
pub struct AuraList {
    instances: Vec<AuraInstance>,
    modifiers: Vec<AuraStatModifier>,
}

impl AuraList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self) -> &[AuraInstance] {
        &self.instances
    }

    pub fn instance(&self, slot: usize) -> Option<&AuraInstance> {
        self.instances.get(slot)
    }

    /// Active instances of an aura
    pub fn get(&self, id: &str) -> impl Iterator<Item = &AuraInstance> + '_ {
        let id = id.to_string();
        self.instances
            .iter()
            .filter(move |a| a.is_active() && a.id() == Some(id.as_str()))
    }

    /// Total stacks of an aura across all sources
    pub fn stacks_of(&self, id: &str) -> u32 {
        self.get(id).map(|a| a.stacks).sum()
    }

    pub fn has(&self, id: &str) -> bool {
        self.stacks_of(id) > 0
    }

    /// Stat modifiers from every active instance
    pub fn stat_modifiers(&self) -> &[AuraStatModifier] {
        &self.modifiers
    }

    /// Apply an aura, merging into a matching instance when one exists
    ///
    /// An instance matches when it carries the same definition and either
    /// the definition combines or the source is the same. Returns the slot
    /// used, or `None` when nothing was applied.
    pub fn add(&mut self, definition: &Arc<AuraDefinition>, application: AuraApplication) -> Option<usize> {
        if application.stacks == 0 {
            return None;
        }

        let existing = self.instances.iter().position(|a| {
            a.is_active()
                && a.id() == Some(definition.id.as_str())
                && (definition.combine || a.source == application.source)
        });

        let slot = match existing {
            Some(slot) => {
                let instance = &mut self.instances[slot];
                let stacks = match definition.stack_policy {
                    StackPolicy::Stack => instance.stacks.saturating_add(application.stacks),
                    StackPolicy::Refresh => application.stacks,
                    StackPolicy::Keep => instance.stacks.max(application.stacks),
                };
                let amount = match definition.amount_policy {
                    AmountPolicy::Accumulate => match (instance.amount, application.amount) {
                        (Some(a), Some(b)) => Some(a + b),
                        (a, b) => a.or(b),
                    },
                    AmountPolicy::Overwrite => application.amount.or(instance.amount),
                    AmountPolicy::Keep => instance.amount.or(application.amount),
                };
                debug!(aura = %definition.id, slot, stacks, "merged aura");
                instance.set(stacks, amount);
                slot
            }
            None => {
                let slot = match self.instances.iter().position(|a| !a.is_active()) {
                    Some(slot) => slot,
                    None => {
                        self.instances.push(AuraInstance::new());
                        self.instances.len() - 1
                    }
                };
                self.instances[slot].set_aura(
                    Arc::clone(definition),
                    application.stacks,
                    application.amount,
                    application.source,
                );
                debug!(aura = %definition.id, slot, stacks = application.stacks, "applied aura");
                slot
            }
        };

        self.rebuild();
        Some(slot)
    }

    /// Remove every instance of an aura; returns whether any was active
    pub fn remove(&mut self, id: &str) -> bool {
        let mut removed = false;
        for instance in &mut self.instances {
            if instance.is_active() && instance.id() == Some(id) {
                instance.remove();
                removed = true;
            }
        }
        if removed {
            self.rebuild();
        }
        removed
    }

    /// Remove stacks from the first active instance of an aura
    pub fn remove_stacks(&mut self, id: &str, count: u32) -> bool {
        let slot = self
            .instances
            .iter()
            .position(|a| a.is_active() && a.id() == Some(id));
        match slot {
            Some(slot) => {
                self.remove_stacks_at(slot, count);
                true
            }
            None => false,
        }
    }

    // === Slot-level transitions ===

    pub fn set_aura_at(
        &mut self,
        slot: usize,
        definition: Arc<AuraDefinition>,
        stacks: u32,
        amount: Option<f64>,
        source: Option<CharacterRef>,
    ) {
        if slot >= self.instances.len() {
            self.instances.resize_with(slot + 1, AuraInstance::new);
        }
        self.instances[slot].set_aura(definition, stacks, amount, source);
        self.rebuild();
    }

    pub fn set_at(&mut self, slot: usize, stacks: u32, amount: Option<f64>) {
        if let Some(instance) = self.instances.get_mut(slot) {
            instance.set(stacks, amount);
            self.rebuild();
        }
    }

    pub fn remove_at(&mut self, slot: usize) {
        if let Some(instance) = self.instances.get_mut(slot) {
            instance.remove();
            self.rebuild();
        }
    }

    pub fn remove_stacks_at(&mut self, slot: usize, count: u32) {
        if let Some(instance) = self.instances.get_mut(slot) {
            instance.remove_stacks(count);
            self.rebuild();
        }
    }

    /// Draw an effect's amount from the instance in `slot`
    pub fn draw(&mut self, slot: usize, effect: &EffectSpec, evaluated: i64) -> i64 {
        match self.instances.get_mut(slot) {
            Some(instance) if instance.is_active() => {
                let drawn = instance.draw(effect, evaluated);
                self.rebuild();
                drawn
            }
            _ => 0,
        }
    }

    /// Non-passive effects of active instances that fire on `trigger`
    pub fn effects_for(&self, trigger: Trigger) -> Vec<TriggeredEffect> {
        self.instances
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_active())
            .filter_map(|(slot, a)| a.base().map(|b| (slot, b)))
            .flat_map(|(slot, base)| {
                base.effects
                    .iter()
                    .filter(move |e| e.trigger == trigger && !matches!(e.kind, EffectKind::StatModifier { .. }))
                    .map(move |e| TriggeredEffect {
                        slot,
                        definition: Arc::clone(base),
                        effect: e.clone(),
                    })
            })
            .collect()
    }

    /// Recompute aggregated stat modifiers
    fn rebuild(&mut self) {
        self.modifiers.clear();
        for instance in self.instances.iter().filter(|a| a.is_active()) {
            let Some(base) = instance.base() else { continue };
            for effect in &base.effects {
                let EffectKind::StatModifier { stat, percent } = &effect.kind else {
                    continue;
                };
                let mut value = match instance.amount {
                    Some(amount) => amount.floor() as i64,
                    None => effect.amount_value(None),
                };
                if effect.stack {
                    value *= i64::from(instance.stacks);
                }
                self.modifiers.push(AuraStatModifier {
                    aura_id: base.id.clone(),
                    stat: stat.clone(),
                    value,
                    percent: *percent,
                });
            }
        }
    }

    // === Persistence ===

    pub fn save(&self) -> Vec<SavedAura> {
        self.instances.iter().map(AuraInstance::to_saved).collect()
    }

    pub fn load(saved: &[SavedAura], registry: &AuraRegistry) -> Self {
        let mut list = AuraList {
            instances: saved
                .iter()
                .map(|s| AuraInstance::from_saved(s, registry))
                .collect(),
            modifiers: Vec::new(),
        };
        list.rebuild();
        list
    }
}
