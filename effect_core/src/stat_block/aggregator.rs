//! StatAccumulator - Collects stat modifications before producing a StatBlock

use crate::stat_block::StatBlock;
use crate::types::StatId;

/// Accumulates flat and percent modifiers from every stat source
///
/// Final value per stat is `floor(flat × (100 + percent) / 100)`: percent
/// modifiers from all sources sum before they multiply.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    pub flat: StatBlock,
    pub percent: StatBlock,
}

impl StatAccumulator {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        StatAccumulator::default()
    }

    pub fn add_flat(&mut self, stat: impl Into<StatId>, value: i64) {
        self.flat.add(stat, value);
    }

    pub fn add_percent(&mut self, stat: impl Into<StatId>, value: i64) {
        self.percent.add(stat, value);
    }

    /// Add a whole block of flat values
    pub fn add_block(&mut self, block: &StatBlock) {
        self.flat.merge(block);
    }

    /// Produce the computed stat block
    pub fn finish(self) -> StatBlock {
        let mut computed = StatBlock::new();
        for (stat, flat) in self.flat.iter() {
            let percent = self.percent.get(stat.as_str());
            computed.set(stat.clone(), (flat * (100 + percent)).div_euclid(100));
        }
        computed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_only() {
        let mut acc = StatAccumulator::new();
        acc.add_flat("strength", 10);
        acc.add_flat("strength", 5);
        assert_eq!(acc.finish().get("strength"), 15);
    }

    #[test]
    fn test_percent_sums_before_multiplying() {
        let mut acc = StatAccumulator::new();
        acc.add_flat("strength", 100);
        acc.add_percent("strength", 20);
        acc.add_percent("strength", 30);
        // 100 * 1.5, not 100 * 1.2 * 1.3
        assert_eq!(acc.finish().get("strength"), 150);
    }

    #[test]
    fn test_percent_floors() {
        let mut acc = StatAccumulator::new();
        acc.add_flat("agility", 7);
        acc.add_percent("agility", 50);
        assert_eq!(acc.finish().get("agility"), 10);
    }

    #[test]
    fn test_percent_without_flat_is_ignored() {
        let mut acc = StatAccumulator::new();
        acc.add_percent("agility", 50);
        assert_eq!(acc.finish().get("agility"), 0);
    }
}
