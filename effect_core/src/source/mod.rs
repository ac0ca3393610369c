//! StatSource - Trait and implementations for stat providers

mod aura;
mod base_stats;
mod gear;

pub use aura::AuraSource;
pub use base_stats::BaseStatsSource;
pub use gear::GearSource;

use crate::stat_block::StatAccumulator;

/// Trait for anything that contributes stats to a character's computed block
pub trait StatSource {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Suggested priorities:
    /// - Base stats: -100
    /// - Gear: 0
    /// - Auras: 200
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's stats to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
