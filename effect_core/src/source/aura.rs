//! AuraSource - Stat modifiers contributed by active auras

use crate::aura::AuraStatModifier;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;

/// The `stat_modifier` effects of a character's active auras
pub struct AuraSource<'a> {
    pub modifiers: &'a [AuraStatModifier],
}

impl<'a> AuraSource<'a> {
    pub fn new(modifiers: &'a [AuraStatModifier]) -> Self {
        AuraSource { modifiers }
    }
}

impl StatSource for AuraSource<'_> {
    fn id(&self) -> &str {
        "auras"
    }

    fn priority(&self) -> i32 {
        200
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for modifier in self.modifiers {
            if modifier.percent {
                stats.add_percent(modifier.stat.clone(), modifier.value);
            } else {
                stats.add_flat(modifier.stat.clone(), modifier.value);
            }
        }
    }
}
