//! BaseStatsSource - A character's innate stats

use crate::source::StatSource;
use crate::stat_block::{StatAccumulator, StatBlock};

/// Innate stats, before equipment and auras
pub struct BaseStatsSource<'a> {
    pub stats: &'a StatBlock,
}

impl<'a> BaseStatsSource<'a> {
    pub fn new(stats: &'a StatBlock) -> Self {
        BaseStatsSource { stats }
    }
}

impl StatSource for BaseStatsSource<'_> {
    fn id(&self) -> &str {
        "base_stats"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.add_block(self.stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_stats_applied_flat() {
        let block = StatBlock::new().with("strength", 10).with("hitpoints", 40);
        let source = BaseStatsSource::new(&block);
        let mut acc = StatAccumulator::new();
        source.apply(&mut acc);

        let computed = acc.finish();
        assert_eq!(computed.get("strength"), 10);
        assert_eq!(computed.get("hitpoints"), 40);
        assert_eq!(source.priority(), -100);
    }
}
