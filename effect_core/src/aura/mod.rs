//! Auras - Buff/debuff definitions and their live, stackable instances

mod definition;
mod instance;
mod list;

pub use definition::{AmountPolicy, AuraDefinition, AuraDefinitionConfig, AuraDefinitionError, StackPolicy};
pub use instance::{AuraInstance, SavedAura, NO_SOURCE};
pub use list::{AuraApplication, AuraList, AuraStatModifier, TriggeredEffect};

use std::collections::HashMap;
use std::sync::Arc;

/// Whether an aura helps or hinders its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuraKind {
    Buff,
    Debuff,
}

/// Registry of loaded buff and debuff definitions
#[derive(Debug, Clone, Default)]
pub struct AuraRegistry {
    buffs: HashMap<String, Arc<AuraDefinition>>,
    debuffs: HashMap<String, Arc<AuraDefinition>>,
}

impl AuraRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: AuraKind, definition: AuraDefinition) {
        let table = match kind {
            AuraKind::Buff => &mut self.buffs,
            AuraKind::Debuff => &mut self.debuffs,
        };
        table.insert(definition.id.clone(), Arc::new(definition));
    }

    pub fn register_buff(&mut self, definition: AuraDefinition) {
        self.register(AuraKind::Buff, definition);
    }

    pub fn register_debuff(&mut self, definition: AuraDefinition) {
        self.register(AuraKind::Debuff, definition);
    }

    pub fn buff(&self, id: &str) -> Option<&Arc<AuraDefinition>> {
        self.buffs.get(id)
    }

    pub fn debuff(&self, id: &str) -> Option<&Arc<AuraDefinition>> {
        self.debuffs.get(id)
    }

    /// Look up in the given table
    pub fn lookup(&self, kind: AuraKind, id: &str) -> Option<&Arc<AuraDefinition>> {
        match kind {
            AuraKind::Buff => self.buff(id),
            AuraKind::Debuff => self.debuff(id),
        }
    }

    /// Look up in either table, buffs first
    pub fn get(&self, id: &str) -> Option<&Arc<AuraDefinition>> {
        self.buff(id).or_else(|| self.debuff(id))
    }

    /// Every definition, buffs then debuffs
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AuraDefinition>> {
        self.buffs.values().chain(self.debuffs.values())
    }

    /// Add another registry's definitions, replacing ids already present
    pub fn extend(&mut self, other: AuraRegistry) {
        self.buffs.extend(other.buffs);
        self.debuffs.extend(other.debuffs);
    }

    pub fn len(&self) -> usize {
        self.buffs.len() + self.debuffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_tables_are_separate() {
        let mut registry = AuraRegistry::new();
        registry.register_buff(AuraDefinition::new("might", "Might"));
        registry.register_debuff(AuraDefinition::new("poison", "Poison"));

        assert!(registry.buff("might").is_some());
        assert!(registry.debuff("might").is_none());
        assert!(registry.lookup(AuraKind::Debuff, "poison").is_some());
        assert!(registry.get("poison").is_some());
        assert_eq!(registry.len(), 2);
    }
}
