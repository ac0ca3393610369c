//! EffectContext - Everything a handler may read or mutate

use crate::character::{Character, Encounter};
use crate::content::ContentRegistry;
use crate::limits::EffectLimitTracker;
use crate::scaling::StatLookup;
use crate::targeting::{self, TargetingContext};
use crate::types::{CharacterRef, PartyScope, Side};
use rand::RngCore;
use std::collections::HashMap;
use thiserror::Error;

use super::{EffectKind, EffectSpec};

/// Sink for player-facing combat messages
pub trait CombatLog {
    fn add(&mut self, message: String);
}

impl CombatLog for Vec<String> {
    fn add(&mut self, message: String) {
        self.push(message);
    }
}

/// Stash errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StashError {
    #[error("not enough '{id}': need {requested}, have {available}")]
    InsufficientMaterial {
        id: String,
        requested: u32,
        available: u32,
    },

    #[error("unknown material '{0}'")]
    UnknownMaterial(String),
}

/// Material storage effects can add to and take from
pub trait Stash {
    fn add_material(&mut self, id: &str, amount: u32);
    fn remove_material(&mut self, id: &str, amount: u32) -> Result<(), StashError>;
    fn count(&self, id: &str) -> u32;
}

/// Counts per material id
#[derive(Debug, Clone, Default)]
pub struct MaterialStash {
    counts: HashMap<String, u32>,
}

impl MaterialStash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(id, n)| (id.as_str(), *n))
    }
}

impl Stash for MaterialStash {
    fn add_material(&mut self, id: &str, amount: u32) {
        let count = self.counts.entry(id.to_string()).or_insert(0);
        *count = count.saturating_add(amount);
    }

    fn remove_material(&mut self, id: &str, amount: u32) -> Result<(), StashError> {
        let available = *self
            .counts
            .get(id)
            .ok_or_else(|| StashError::UnknownMaterial(id.to_string()))?;
        if available < amount {
            return Err(StashError::InsufficientMaterial {
                id: id.to_string(),
                requested: amount,
                available,
            });
        }
        if available == amount {
            self.counts.remove(id);
        } else {
            self.counts.insert(id.to_string(), available - amount);
        }
        Ok(())
    }

    fn count(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }
}

/// Per-invocation state threaded through effect processing
///
/// Characters are addressed by [`CharacterRef`] into `encounter`; the
/// context never holds a character directly.
pub struct EffectContext<'a> {
    pub encounter: &'a mut Encounter,
    pub content: &'a ContentRegistry,

    // === Roles ===
    pub source: Option<CharacterRef>,
    pub target: Option<CharacterRef>,
    pub attacker: Option<CharacterRef>,
    /// Credited with damage dealt instead of `source` (aura appliers)
    pub credited: Option<CharacterRef>,
    pub exclude: Vec<CharacterRef>,
    pub allow_dead: bool,

    // === Optional capabilities ===
    pub stash: Option<&'a mut dyn Stash>,
    pub limits: Option<&'a mut EffectLimitTracker>,

    pub log: &'a mut dyn CombatLog,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        encounter: &'a mut Encounter,
        content: &'a ContentRegistry,
        log: &'a mut dyn CombatLog,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        EffectContext {
            encounter,
            content,
            source: None,
            target: None,
            attacker: None,
            credited: None,
            exclude: Vec::new(),
            allow_dead: false,
            stash: None,
            limits: None,
            log,
            rng,
        }
    }

    pub fn with_source(mut self, source: CharacterRef) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: CharacterRef) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_attacker(mut self, attacker: CharacterRef) -> Self {
        self.attacker = Some(attacker);
        self
    }

    pub fn with_stash(mut self, stash: &'a mut dyn Stash) -> Self {
        self.stash = Some(stash);
        self
    }

    pub fn with_limits(mut self, limits: &'a mut EffectLimitTracker) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn excluding(mut self, exclude: Vec<CharacterRef>) -> Self {
        self.exclude = exclude;
        self
    }

    /// The source character, if it still occupies its slot
    pub fn source_character(&self) -> Option<&Character> {
        self.encounter.resolve_source(self.source)
    }

    /// Character recorded as the attacker of damage this context deals
    pub fn damage_source(&self) -> Option<CharacterRef> {
        self.credited.or(self.source)
    }

    /// Identity used for usage limits
    pub fn source_key(&self) -> String {
        match (self.source, self.source_character()) {
            (Some(at), Some(c)) => format!("{}#{}", c.id, at.index()),
            _ => "global".to_string(),
        }
    }

    /// Effect amount scaled by the source's stats
    pub fn amount(&self, effect: &EffectSpec) -> i64 {
        effect.amount_value(self.source_character().map(|c| c as &dyn StatLookup))
    }

    /// Effect stack count scaled by the source's stats, never negative
    pub fn stacks(&self, effect: &EffectSpec) -> u32 {
        let stacks = effect.stacks_value(self.source_character().map(|c| c as &dyn StatLookup));
        u32::try_from(stacks.max(0)).unwrap_or(u32::MAX)
    }

    /// Party positional selectors resolve against
    pub fn party_for(&self, effect: &EffectSpec) -> Side {
        match (effect.party_scope(), self.source) {
            (PartyScope::Ally, Some(at)) => at.side,
            (PartyScope::Enemy, Some(at)) => at.side.opponent(),
            (PartyScope::Ally, None) => Side::Heroes,
            (PartyScope::Enemy, None) => Side::Enemies,
        }
    }

    /// Resolve the effect's selector against this context
    pub fn resolve_targets(&mut self, effect: &EffectSpec) -> Vec<CharacterRef> {
        let party = self.party_for(effect);
        let ctx = TargetingContext {
            encounter: &*self.encounter,
            party,
            self_ref: self.source,
            attacker: self.attacker,
            target: self.target,
            exclude: &self.exclude,
            allow_dead: self.allow_dead || matches!(effect.kind, EffectKind::Revive),
        };
        targeting::resolve(effect.target, &ctx, &mut *self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stash_add_remove() {
        let mut stash = MaterialStash::new();
        stash.add_material("copper_ore", 5);
        assert_eq!(stash.count("copper_ore"), 5);

        assert!(stash.remove_material("copper_ore", 3).is_ok());
        assert_eq!(stash.count("copper_ore"), 2);

        let err = stash.remove_material("copper_ore", 3).unwrap_err();
        assert_eq!(
            err,
            StashError::InsufficientMaterial {
                id: "copper_ore".to_string(),
                requested: 3,
                available: 2,
            }
        );
        assert_eq!(stash.count("copper_ore"), 2);

        assert!(stash.remove_material("copper_ore", 2).is_ok());
        assert_eq!(stash.count("copper_ore"), 0);
    }

    #[test]
    fn test_stash_unknown_material() {
        let mut stash = MaterialStash::new();
        assert_eq!(
            stash.remove_material("moonstone", 1),
            Err(StashError::UnknownMaterial("moonstone".to_string()))
        );
    }

    #[test]
    fn test_vec_is_a_log() {
        let mut log: Vec<String> = Vec::new();
        CombatLog::add(&mut log, "hello".to_string());
        assert_eq!(log, vec!["hello".to_string()]);
    }
}
