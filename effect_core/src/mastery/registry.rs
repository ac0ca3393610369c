//! MasteryRegistry - Loaded categories with cached level lookups

use super::{MasteryCategory, MilestoneEffect};
use crate::cache::EffectCache;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Registry of mastery categories
///
/// `(category, level)` lookups are cached and tagged with the category id;
/// replacing a category drops its cached results.
#[derive(Debug, Clone, Default)]
pub struct MasteryRegistry {
    categories: HashMap<String, MasteryCategory>,
    cache: EffectCache<(String, u32), Vec<MilestoneEffect>>,
}

impl MasteryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category, replacing any with the same id
    pub fn register(&mut self, category: MasteryCategory) {
        if self.categories.contains_key(&category.id) {
            debug!(category = %category.id, "replacing mastery category");
            self.cache.invalidate_dependency(category.id.clone());
            self.cache.clear_invalidated();
        }
        self.categories.insert(category.id.clone(), category);
    }

    pub fn get(&self, id: &str) -> Option<&MasteryCategory> {
        self.categories.get(id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Effects active in a category at a level; empty for unknown categories
    pub fn effects_at(&mut self, id: &str, level: u32) -> Vec<MilestoneEffect> {
        let key = (id.to_string(), level);
        if let Some(effects) = self.cache.get(&key) {
            return effects.clone();
        }

        let Some(category) = self.categories.get(id) else {
            warn!(category = id, "unknown mastery category");
            return Vec::new();
        };
        let effects = category.effects_at_level(level);
        debug!(category = id, level, count = effects.len(), "cached mastery effects");
        self.cache.set(key, effects.clone(), [id]);
        effects
    }

    /// Number of cached lookups
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}
