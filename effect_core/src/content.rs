//! ContentRegistry - Loaded stat, material and aura definitions

use crate::aura::AuraRegistry;
use crate::types::StatId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A stat the content knows about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDefinition {
    pub id: StatId,
    #[serde(default)]
    pub name: String,
}

impl StatDefinition {
    pub fn new(id: impl Into<StatId>, name: impl Into<String>) -> Self {
        StatDefinition {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A material that can sit in a stash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl MaterialDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        MaterialDefinition {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Definitions effect handlers look ids up in
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    stats: HashMap<StatId, StatDefinition>,
    materials: HashMap<String, MaterialDefinition>,
    pub auras: AuraRegistry,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stat(&mut self, stat: StatDefinition) {
        self.stats.insert(stat.id.clone(), stat);
    }

    pub fn add_material(&mut self, material: MaterialDefinition) {
        self.materials.insert(material.id.clone(), material);
    }

    pub fn stat(&self, id: &str) -> Option<&StatDefinition> {
        self.stats.get(id)
    }

    pub fn has_stat(&self, id: &str) -> bool {
        self.stats.contains_key(id)
    }

    pub fn material(&self, id: &str) -> Option<&MaterialDefinition> {
        self.materials.get(id)
    }

    pub fn stats(&self) -> impl Iterator<Item = &StatDefinition> {
        self.stats.values()
    }

    pub fn materials(&self) -> impl Iterator<Item = &MaterialDefinition> {
        self.materials.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_str() {
        let mut content = ContentRegistry::new();
        content.add_stat(StatDefinition::new("strength", "Strength"));
        content.add_material(MaterialDefinition::new("copper_ore", "Copper Ore"));

        assert!(content.has_stat("strength"));
        assert!(!content.has_stat("luck"));
        assert_eq!(content.material("copper_ore").map(|m| m.name.as_str()), Some("Copper Ore"));
        assert!(content.material("gold").is_none());
    }
}
