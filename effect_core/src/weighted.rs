//! WeightedTable - Weighted random selection over `{id, weight}` entries

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One weighted choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntry<T> {
    pub id: T,
    pub weight: u32,
}

impl<T> WeightedEntry<T> {
    pub fn new(id: T, weight: u32) -> Self {
        WeightedEntry { id, weight }
    }
}

/// Weighted pool for loot rolls and random effect choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<WeightedEntry<T>>", into = "Vec<WeightedEntry<T>>")]
#[serde(bound(
    serialize = "T: Clone + Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct WeightedTable<T> {
    entries: Vec<WeightedEntry<T>>,
    total_weight: u64,
}

impl<T> Default for WeightedTable<T> {
    fn default() -> Self {
        WeightedTable {
            entries: Vec::new(),
            total_weight: 0,
        }
    }
}

impl<T> From<Vec<WeightedEntry<T>>> for WeightedTable<T> {
    fn from(entries: Vec<WeightedEntry<T>>) -> Self {
        let mut table = WeightedTable::default();
        table.load_table(entries);
        table
    }
}

impl<T: Clone> From<WeightedTable<T>> for Vec<WeightedEntry<T>> {
    fn from(table: WeightedTable<T>) -> Self {
        table.entries
    }
}

impl<T> WeightedTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all entries and recompute the total weight
    pub fn load_table(&mut self, entries: Vec<WeightedEntry<T>>) {
        self.total_weight = entries.iter().map(|e| u64::from(e.weight)).sum();
        self.entries = entries;
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn entries(&self) -> &[WeightedEntry<T>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.total_weight == 0
    }

    /// Draw an entry with probability `weight / total_weight`
    ///
    /// Entries are scanned in list order against one uniform draw in
    /// `[0, total_weight)`.
    ///
    /// # Panics
    ///
    /// Panics if the table is empty or every weight is zero. Check
    /// [`is_empty`](Self::is_empty) first when the table comes from content.
    pub fn get_entry<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let roll = rng.gen_range(0..self.total_weight);
        let mut cumulative = 0u64;
        for entry in &self.entries {
            cumulative += u64::from(entry.weight);
            if roll < cumulative {
                return &entry.id;
            }
        }
        unreachable!("roll is always below the total weight")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn table() -> WeightedTable<&'static str> {
        WeightedTable::from(vec![
            WeightedEntry::new("common", 70),
            WeightedEntry::new("rare", 25),
            WeightedEntry::new("epic", 5),
        ])
    }

    #[test]
    fn test_load_table_resets() {
        let mut t = table();
        assert_eq!(t.total_weight(), 100);
        t.load_table(vec![WeightedEntry::new("only", 3)]);
        assert_eq!(t.total_weight(), 3);
        assert_eq!(t.entries().len(), 1);
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let t = WeightedTable::from(vec![WeightedEntry::new("never", 0), WeightedEntry::new("always", 1)]);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            assert_eq!(*t.get_entry(&mut rng), "always");
        }
    }

    #[test]
    fn test_frequencies_converge() {
        let t = table();
        let mut rng = StdRng::seed_from_u64(42);
        let samples = 100_000;
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for _ in 0..samples {
            *counts.entry(*t.get_entry(&mut rng)).or_insert(0) += 1;
        }

        for entry in t.entries() {
            let expected = f64::from(entry.weight) / t.total_weight() as f64;
            let observed = f64::from(counts.get(entry.id).copied().unwrap_or(0)) / f64::from(samples);
            assert!(
                (observed - expected).abs() < 0.01,
                "{}: observed {observed}, expected {expected}",
                entry.id
            );
        }
    }

    #[test]
    #[should_panic]
    fn test_empty_table_panics() {
        let t: WeightedTable<u32> = WeightedTable::new();
        let mut rng = StdRng::seed_from_u64(1);
        t.get_entry(&mut rng);
    }

    #[test]
    fn test_deserialize_from_list() {
        let t: WeightedTable<String> =
            serde_json::from_str(r#"[{"id":"a","weight":1},{"id":"b","weight":3}]"#).unwrap();
        assert_eq!(t.total_weight(), 4);
    }
}
