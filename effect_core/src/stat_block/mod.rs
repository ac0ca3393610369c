//! StatBlock - Integer stat mapping with additive aggregation

mod aggregator;

pub use aggregator::StatAccumulator;

use crate::types::StatId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from stat id to integer value
///
/// Absent stats read as 0. A character owns several of these (base, one per
/// equipment slot, computed) and rebuilds the computed one whenever any input
/// changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatBlock {
    values: BTreeMap<StatId, i64>,
}

impl StatBlock {
    /// Create an empty stat block
    pub fn new() -> Self {
        StatBlock::default()
    }

    /// Read a stat; absent stats are 0
    pub fn get(&self, stat: &str) -> i64 {
        self.values.get(stat).copied().unwrap_or(0)
    }

    /// Overwrite a stat value
    pub fn set(&mut self, stat: impl Into<StatId>, value: i64) {
        self.values.insert(stat.into(), value);
    }

    /// Add to a stat value
    pub fn add(&mut self, stat: impl Into<StatId>, value: i64) {
        *self.values.entry(stat.into()).or_insert(0) += value;
    }

    /// Builder form of [`StatBlock::set`]
    pub fn with(mut self, stat: impl Into<StatId>, value: i64) -> Self {
        self.set(stat, value);
        self
    }

    /// Add every stat of `other` into this block
    pub fn merge(&mut self, other: &StatBlock) {
        for (stat, value) in &other.values {
            *self.values.entry(stat.clone()).or_insert(0) += value;
        }
    }

    /// Remove every stat
    pub fn reset(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate stats in id order
    pub fn iter(&self) -> impl Iterator<Item = (&StatId, i64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }
}

impl FromIterator<(StatId, i64)> for StatBlock {
    fn from_iter<I: IntoIterator<Item = (StatId, i64)>>(iter: I) -> Self {
        let mut block = StatBlock::new();
        for (stat, value) in iter {
            block.add(stat, value);
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_stat_reads_zero() {
        let block = StatBlock::new();
        assert_eq!(block.get("strength"), 0);
    }

    #[test]
    fn test_add_and_merge() {
        let mut a = StatBlock::new().with("strength", 5);
        a.add("strength", 3);
        let b = StatBlock::new().with("strength", 2).with("agility", 4);
        a.merge(&b);

        assert_eq!(a.get("strength"), 10);
        assert_eq!(a.get("agility"), 4);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_reset_clears() {
        let mut block = StatBlock::new().with("strength", 5);
        block.reset();
        assert!(block.is_empty());
        assert_eq!(block.get("strength"), 0);
    }

    #[test]
    fn test_deserialize_from_toml_table() {
        let block: StatBlock = toml::from_str("strength = 4\nhitpoints = 30").unwrap();
        assert_eq!(block.get("strength"), 4);
        assert_eq!(block.get("hitpoints"), 30);
    }
}
