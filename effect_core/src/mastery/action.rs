//! MasteryAction - Per-entity cache of effects at the current mastery level

use super::{MasteryRegistry, MilestoneEffect};
use tracing::debug;

/// Effects an entity built for one mastery level
#[derive(Debug, Clone, Default)]
pub struct MasteryEffectCache {
    built_at: Option<u32>,
    effects: Vec<MilestoneEffect>,
}

impl MasteryEffectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level the cached effects were built for
    pub fn built_at(&self) -> Option<u32> {
        self.built_at
    }

    /// Cached effects for `level`, rebuilding when the level changed
    pub fn get_or_build(
        &mut self,
        level: u32,
        build: impl FnOnce() -> Vec<MilestoneEffect>,
    ) -> &[MilestoneEffect] {
        if self.built_at != Some(level) {
            self.effects = build();
            self.built_at = Some(level);
            debug!(level, count = self.effects.len(), "rebuilt mastery effects");
        }
        &self.effects
    }

    pub fn invalidate(&mut self) {
        self.built_at = None;
        self.effects.clear();
    }
}

/// An action whose strength grows with a mastery category
pub trait MasteryAction {
    fn mastery_category_id(&self) -> &str;

    fn mastery_level(&self) -> u32;

    fn mastery_cache(&mut self) -> &mut MasteryEffectCache;

    /// Milestone effects active at the current level
    fn active_mastery_effects(&mut self, registry: &MasteryRegistry) -> &[MilestoneEffect] {
        let level = self.mastery_level();
        let category = registry.get(self.mastery_category_id());
        let build = move || {
            category
                .map(|c| c.effects_at_level(level))
                .unwrap_or_default()
        };
        self.mastery_cache().get_or_build(level, build)
    }

    /// Summed value of the active effects of one type
    fn mastery_bonus(&mut self, registry: &MasteryRegistry, effect_type: &str) -> f64 {
        self.active_mastery_effects(registry)
            .iter()
            .filter(|e| e.effect_type == effect_type)
            .map(|e| e.value)
            .sum()
    }
}
