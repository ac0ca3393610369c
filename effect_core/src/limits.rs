//! EffectLimitTracker - Per-combat, per-round and per-turn trigger counters

use crate::effect::EffectSpec;
use crate::types::LimitScope;
use serde_json::json;
use std::collections::HashMap;

type LimitKey = (String, String);

/// Counts how often limited effects fired, per source
///
/// Each combat instance owns its own tracker. Round and turn counters are
/// reset by the caller at those boundaries; a combat reset clears all three.
#[derive(Debug, Clone, Default)]
pub struct EffectLimitTracker {
    combat: HashMap<LimitKey, u32>,
    round: HashMap<LimitKey, u32>,
    turn: HashMap<LimitKey, u32>,
}

impl EffectLimitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Structural signature of the fields that identify an effect
    pub fn signature(effect: &EffectSpec) -> String {
        json!({
            "type": effect.effect_type().map(|t| t.as_str()),
            "trigger": effect.trigger,
            "id": effect.kind.reference_id(),
            "stat": effect.kind.stat(),
            "amount": effect.amount,
        })
        .to_string()
    }

    fn counter(&self, scope: LimitScope) -> &HashMap<LimitKey, u32> {
        match scope {
            LimitScope::Combat => &self.combat,
            LimitScope::Round => &self.round,
            LimitScope::Turn => &self.turn,
        }
    }

    fn counter_mut(&mut self, scope: LimitScope) -> &mut HashMap<LimitKey, u32> {
        match scope {
            LimitScope::Combat => &mut self.combat,
            LimitScope::Round => &mut self.round,
            LimitScope::Turn => &mut self.turn,
        }
    }

    /// Times an effect has fired for `source` within `scope`
    pub fn count(&self, scope: LimitScope, effect: &EffectSpec, source: &str) -> u32 {
        let key = (source.to_string(), Self::signature(effect));
        self.counter(scope).get(&key).copied().unwrap_or(0)
    }

    /// Whether a limited effect may fire again; unlimited effects always may
    pub fn can_trigger(&self, effect: &EffectSpec, source: &str) -> bool {
        match effect.limit {
            None => true,
            Some(scope) => self.count(scope, effect, source) < effect.times.unwrap_or(1),
        }
    }

    pub fn record(&mut self, effect: &EffectSpec, source: &str) {
        let Some(scope) = effect.limit else { return };
        let key = (source.to_string(), Self::signature(effect));
        *self.counter_mut(scope).entry(key).or_insert(0) += 1;
    }

    pub fn reset(&mut self, scope: LimitScope) {
        match scope {
            LimitScope::Combat => self.reset_all(),
            LimitScope::Round => self.round.clear(),
            LimitScope::Turn => self.turn.clear(),
        }
    }

    pub fn reset_all(&mut self) {
        self.combat.clear();
        self.round.clear();
        self.turn.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;
    use crate::scaling::ScalableValue;

    fn strike(limit: LimitScope, times: u32) -> EffectSpec {
        EffectSpec::new(EffectKind::Damage { stat: None })
            .with_amount(ScalableValue::flat(5.0))
            .with_limit(limit, times)
    }

    #[test]
    fn test_turn_limit_once() {
        let mut tracker = EffectLimitTracker::new();
        let effect = strike(LimitScope::Turn, 1);

        assert!(tracker.can_trigger(&effect, "knight"));
        tracker.record(&effect, "knight");
        assert!(!tracker.can_trigger(&effect, "knight"));

        tracker.reset(LimitScope::Turn);
        assert!(tracker.can_trigger(&effect, "knight"));
    }

    #[test]
    fn test_limits_are_per_source() {
        let mut tracker = EffectLimitTracker::new();
        let effect = strike(LimitScope::Round, 1);
        tracker.record(&effect, "knight");
        assert!(tracker.can_trigger(&effect, "archer"));
    }

    #[test]
    fn test_times_cap() {
        let mut tracker = EffectLimitTracker::new();
        let effect = strike(LimitScope::Combat, 3);
        for _ in 0..3 {
            assert!(tracker.can_trigger(&effect, "knight"));
            tracker.record(&effect, "knight");
        }
        assert!(!tracker.can_trigger(&effect, "knight"));
        assert_eq!(tracker.count(LimitScope::Combat, &effect, "knight"), 3);
    }

    #[test]
    fn test_unlimited_never_blocked_or_counted() {
        let mut tracker = EffectLimitTracker::new();
        let effect = EffectSpec::new(EffectKind::Damage { stat: None });
        for _ in 0..5 {
            tracker.record(&effect, "knight");
        }
        assert!(tracker.can_trigger(&effect, "knight"));
    }

    #[test]
    fn test_round_reset_keeps_combat() {
        let mut tracker = EffectLimitTracker::new();
        let per_round = strike(LimitScope::Round, 1);
        let per_combat = strike(LimitScope::Combat, 1);
        tracker.record(&per_round, "knight");
        tracker.record(&per_combat, "knight");

        tracker.reset(LimitScope::Round);
        assert!(tracker.can_trigger(&per_round, "knight"));
        assert!(!tracker.can_trigger(&per_combat, "knight"));

        tracker.reset(LimitScope::Combat);
        assert!(tracker.can_trigger(&per_combat, "knight"));
    }

    #[test]
    fn test_signature_distinguishes_amount() {
        let a = strike(LimitScope::Turn, 1);
        let b = EffectSpec::new(EffectKind::Damage { stat: None })
            .with_amount(ScalableValue::flat(6.0))
            .with_limit(LimitScope::Turn, 1);
        assert_ne!(EffectLimitTracker::signature(&a), EffectLimitTracker::signature(&b));
    }
}
