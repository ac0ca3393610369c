//! EffectCache - Values tagged with dependencies that can be marked dirty

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::trace;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    dependencies: Vec<String>,
}

/// Key/value cache with dependency-tag invalidation
///
/// An entry is absent once any of its tags is dirty. Reads evict such
/// entries lazily; [`clear_invalidated`](Self::clear_invalidated) evicts
/// the rest and clears the dirty set.
#[derive(Debug, Clone)]
pub struct EffectCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    dirty: HashSet<String>,
}

impl<K, V> Default for EffectCache<K, V> {
    fn default() -> Self {
        EffectCache {
            entries: HashMap::new(),
            dirty: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash, V> EffectCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_stale(&self, entry: &CacheEntry<V>) -> bool {
        entry.dependencies.iter().any(|d| self.dirty.contains(d))
    }

    /// Cached value, or `None` if missing or invalidated
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let stale = self.entries.get(key).map(|e| self.is_stale(e))?;
        if stale {
            trace!("evicting stale cache entry");
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn set(&mut self, key: K, value: V, dependencies: impl IntoIterator<Item = impl Into<String>>) {
        let dependencies = dependencies.into_iter().map(Into::into).collect();
        self.entries.insert(key, CacheEntry { value, dependencies });
    }

    /// Mark a tag dirty
    pub fn invalidate_dependency(&mut self, tag: impl Into<String>) {
        self.dirty.insert(tag.into());
    }

    pub fn is_dirty(&self, tag: &str) -> bool {
        self.dirty.contains(tag)
    }

    /// Evict every entry with a dirty tag, then forget the dirty tags
    pub fn clear_invalidated(&mut self) {
        if self.dirty.is_empty() {
            return;
        }
        let dirty = std::mem::take(&mut self.dirty);
        self.entries
            .retain(|_, e| !e.dependencies.iter().any(|d| dirty.contains(d)));
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.dirty.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidated_entry_absent_until_reset() {
        let mut cache: EffectCache<&str, i32> = EffectCache::new();
        cache.set("attack", 10, ["statsDirty"]);
        assert_eq!(cache.get(&"attack"), Some(&10));

        cache.invalidate_dependency("statsDirty");
        assert_eq!(cache.get(&"attack"), None);

        // Still dirty: a fresh set is hidden until the dirty set clears
        cache.set("attack", 12, ["statsDirty"]);
        assert_eq!(cache.get(&"attack"), None);

        cache.clear_invalidated();
        cache.set("attack", 12, ["statsDirty"]);
        assert_eq!(cache.get(&"attack"), Some(&12));
    }

    #[test]
    fn test_unrelated_tags_survive() {
        let mut cache: EffectCache<&str, i32> = EffectCache::new();
        cache.set("a", 1, ["x"]);
        cache.set("b", 2, ["y"]);
        cache.set("c", 3, Vec::<String>::new());

        cache.invalidate_dependency("x");
        cache.clear_invalidated();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert!(!cache.is_dirty("x"));
    }

    #[test]
    fn test_invalidate_all() {
        let mut cache: EffectCache<u32, u32> = EffectCache::new();
        cache.set(1, 1, ["x"]);
        cache.invalidate_dependency("y");
        cache.invalidate_all();
        assert!(cache.is_empty());
        assert!(!cache.is_dirty("y"));
    }
}
