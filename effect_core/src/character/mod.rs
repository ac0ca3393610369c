//! Character - A combat participant with stats, resources and auras

mod party;

pub use party::{Encounter, Party};

use crate::aura::AuraList;
use crate::scaling::StatLookup;
use crate::source::{AuraSource, BaseStatsSource, GearSource, StatSource};
use crate::stat_block::{StatAccumulator, StatBlock};
use crate::types::{stats, CharacterRef, EquipmentSlot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A hero or enemy occupying a party slot
#[derive(Debug, Clone)]
pub struct Character {
    // === Identity ===
    pub id: String,
    pub name: String,
    /// Combat role; `None` marks an empty slot that never takes part in
    /// positional targeting
    pub role: Option<String>,

    // === Stats ===
    base_stats: StatBlock,
    equipment: HashMap<EquipmentSlot, StatBlock>,
    /// Computed from base, equipment and auras
    stats: StatBlock,

    // === Resources ===
    pub hitpoints: i64,
    pub energy: i64,
    pub max_energy: i64,
    pub dead: bool,
    /// Last character that damaged this one
    pub last_attacker: Option<CharacterRef>,

    // === Auras ===
    auras: AuraList,
}

/// Result of a character taking damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageTaken {
    pub amount: i64,
    pub hitpoints_before: i64,
    pub hitpoints_after: i64,
    pub killing_blow: bool,
}

impl Character {
    /// Create a character with a combat role and no stats
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Character {
            id: id.into(),
            name: name.into(),
            role: Some(role.into()),
            base_stats: StatBlock::new(),
            equipment: HashMap::new(),
            stats: StatBlock::new(),
            hitpoints: 0,
            energy: 0,
            max_energy: 100,
            dead: false,
            last_attacker: None,
            auras: AuraList::new(),
        }
    }

    /// An empty slot
    pub fn empty() -> Self {
        let mut character = Character::new("empty", "Empty", "");
        character.role = None;
        character.dead = true;
        character
    }

    /// Set base stats and start at full hitpoints
    pub fn with_base_stats(mut self, stats: StatBlock) -> Self {
        self.base_stats = stats;
        self.rebuild_stats();
        self.hitpoints = self.max_hitpoints();
        self
    }

    pub fn with_max_energy(mut self, max_energy: i64) -> Self {
        self.max_energy = max_energy;
        self
    }

    /// Whether this character occupies its slot for combat
    pub fn is_in_combat(&self) -> bool {
        self.role.as_deref().is_some_and(|r| !r.is_empty() && r != "none")
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn max_hitpoints(&self) -> i64 {
        self.stats.get(stats::HITPOINTS)
    }

    /// Hitpoints as a fraction of max (0.0 when max is 0)
    pub fn hitpoints_percent(&self) -> f64 {
        let max = self.max_hitpoints();
        if max <= 0 {
            return 0.0;
        }
        self.hitpoints as f64 / max as f64
    }

    /// Computed stat block
    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn base_stats(&self) -> &StatBlock {
        &self.base_stats
    }

    // === Resource Methods ===

    /// Heal by amount, capped at max; returns hitpoints actually restored
    pub fn heal(&mut self, amount: i64) -> i64 {
        if self.dead || amount <= 0 {
            return 0;
        }
        let before = self.hitpoints;
        self.hitpoints = (self.hitpoints + amount).min(self.max_hitpoints());
        self.hitpoints - before
    }

    /// Take damage, dying at 0 hitpoints
    pub fn take_damage(&mut self, amount: i64, attacker: Option<CharacterRef>) -> DamageTaken {
        let before = self.hitpoints;
        if self.dead {
            return DamageTaken {
                amount: 0,
                hitpoints_before: before,
                hitpoints_after: before,
                killing_blow: false,
            };
        }

        let amount = amount.max(0);
        self.hitpoints = (self.hitpoints - amount).max(0);
        if attacker.is_some() {
            self.last_attacker = attacker;
        }
        let killing_blow = self.hitpoints == 0;
        if killing_blow {
            self.dead = true;
        }

        DamageTaken {
            amount: before - self.hitpoints,
            hitpoints_before: before,
            hitpoints_after: self.hitpoints,
            killing_blow,
        }
    }

    /// Restore energy, capped at max; returns energy actually restored
    pub fn restore_energy(&mut self, amount: i64) -> i64 {
        let before = self.energy;
        self.energy = (self.energy + amount).clamp(0, self.max_energy);
        self.energy - before
    }

    /// Bring a dead character back at `percent` of max hitpoints (at least 1)
    pub fn revive(&mut self, percent: i64) -> Option<i64> {
        if !self.dead || !self.is_in_combat() {
            return None;
        }
        let hitpoints = (self.max_hitpoints() * percent / 100).clamp(1, self.max_hitpoints().max(1));
        self.dead = false;
        self.hitpoints = hitpoints;
        Some(hitpoints)
    }

    // === Equipment Methods ===

    /// Equip an item's stats into a slot, rebuilding stats
    pub fn equip(&mut self, slot: EquipmentSlot, item_stats: StatBlock) {
        self.equipment.insert(slot, item_stats);
        self.rebuild_stats();
    }

    /// Unequip a slot, returning its stats if present
    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<StatBlock> {
        let item = self.equipment.remove(&slot);
        if item.is_some() {
            self.rebuild_stats();
        }
        item
    }

    pub fn set_base_stats(&mut self, stats: StatBlock) {
        self.base_stats = stats;
        self.rebuild_stats();
    }

    // === Aura Methods ===

    pub fn auras(&self) -> &AuraList {
        &self.auras
    }

    /// Mutate the aura list; stats are rebuilt before returning
    pub fn with_auras<R>(&mut self, f: impl FnOnce(&mut AuraList) -> R) -> R {
        let result = f(&mut self.auras);
        self.rebuild_stats();
        result
    }

    /// Rebuild computed stats from base, equipment and aura sources
    pub fn rebuild_stats(&mut self) {
        let computed = {
            let mut sources: Vec<Box<dyn StatSource + '_>> = Vec::new();
            sources.push(Box::new(BaseStatsSource::new(&self.base_stats)));
            for (slot, item) in &self.equipment {
                sources.push(Box::new(GearSource::new(*slot, item)));
            }
            sources.push(Box::new(AuraSource::new(self.auras.stat_modifiers())));
            sources.sort_by_key(|s| s.priority());

            let mut accumulator = StatAccumulator::new();
            for source in &sources {
                source.apply(&mut accumulator);
            }
            accumulator.finish()
        };

        self.stats = computed;
        self.hitpoints = self.hitpoints.min(self.max_hitpoints());
    }
}

impl StatLookup for Character {
    fn effective_stat(&self, stat: &str) -> i64 {
        self.stats.get(stat)
    }

    fn has_stats(&self) -> bool {
        !self.stats.is_empty()
    }
}
