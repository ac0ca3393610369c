//! Target resolution - Selector keyword plus combat context to characters

use crate::character::{Character, Encounter};
use crate::types::{CharacterRef, Position, Side};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which character(s) an effect lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSelector {
    #[serde(rename = "self")]
    SelfTarget,
    Attacker,
    #[default]
    Target,
    /// Resolves to nobody
    #[serde(rename = "none")]
    NoTarget,
    Front,
    Center,
    Back,
    /// Front and center, each checked on its own
    Cleave,
    Random,
    /// Lowest hitpoints percentage
    Lowest,
    #[serde(alias = "aoe")]
    All,
    Dead,
    #[serde(other)]
    Unknown,
}

/// Everything a selector can look at
#[derive(Debug, Clone, Copy)]
pub struct TargetingContext<'a> {
    pub encounter: &'a Encounter,
    /// Party positional selectors run against
    pub party: Side,
    pub self_ref: Option<CharacterRef>,
    pub attacker: Option<CharacterRef>,
    pub target: Option<CharacterRef>,
    pub exclude: &'a [CharacterRef],
    /// Let fixed-role selectors return dead characters
    pub allow_dead: bool,
}

impl<'a> TargetingContext<'a> {
    pub fn new(encounter: &'a Encounter, party: Side) -> Self {
        TargetingContext {
            encounter,
            party,
            self_ref: None,
            attacker: None,
            target: None,
            exclude: &[],
            allow_dead: false,
        }
    }

    fn is_excluded(&self, at: CharacterRef) -> bool {
        self.exclude.contains(&at)
    }

    /// Alive, in combat and not excluded
    fn is_eligible(&self, at: CharacterRef) -> bool {
        let c = self.encounter.get(at);
        c.is_in_combat() && c.is_alive() && !self.is_excluded(at)
    }

    fn fixed(&self, role: Option<CharacterRef>) -> Vec<CharacterRef> {
        role.filter(|r| self.allow_dead || self.encounter.get(*r).is_alive())
            .into_iter()
            .collect()
    }

    fn members(&self) -> impl Iterator<Item = (CharacterRef, &'a Character)> + '_ {
        let side = self.party;
        let encounter = self.encounter;
        Position::ALL.into_iter().map(move |p| {
            let at = CharacterRef::new(side, p);
            (at, encounter.get(at))
        })
    }

    fn eligible(&self) -> Vec<CharacterRef> {
        self.members()
            .map(|(at, _)| at)
            .filter(|at| self.is_eligible(*at))
            .collect()
    }

    fn positional(&self, position: Position) -> Vec<CharacterRef> {
        position
            .fallback_order()
            .into_iter()
            .map(|p| CharacterRef::new(self.party, p))
            .find(|at| self.is_eligible(*at))
            .into_iter()
            .collect()
    }
}

/// Resolve a selector to concrete characters
///
/// Only [`TargetSelector::Random`] draws from `rng`, one draw per call.
pub fn resolve<R: Rng + ?Sized>(
    selector: TargetSelector,
    ctx: &TargetingContext<'_>,
    rng: &mut R,
) -> Vec<CharacterRef> {
    match selector {
        TargetSelector::SelfTarget => ctx.fixed(ctx.self_ref),
        TargetSelector::Attacker => ctx.fixed(ctx.attacker),
        TargetSelector::Target => ctx.fixed(ctx.target),
        TargetSelector::NoTarget | TargetSelector::Unknown => Vec::new(),

        TargetSelector::Front => ctx.positional(Position::Front),
        TargetSelector::Center => ctx.positional(Position::Center),
        TargetSelector::Back => ctx.positional(Position::Back),

        TargetSelector::Cleave => [Position::Front, Position::Center]
            .into_iter()
            .map(|p| CharacterRef::new(ctx.party, p))
            .filter(|at| ctx.is_eligible(*at))
            .collect(),

        TargetSelector::Random => {
            let pool = ctx.eligible();
            if pool.is_empty() {
                return pool;
            }
            vec![pool[rng.gen_range(0..pool.len())]]
        }

        TargetSelector::Lowest => {
            let mut lowest: Option<(CharacterRef, f64)> = None;
            for (at, c) in ctx.members() {
                if !ctx.is_eligible(at) {
                    continue;
                }
                let pct = c.hitpoints_percent();
                if lowest.map_or(true, |(_, best)| pct < best) {
                    lowest = Some((at, pct));
                }
            }
            lowest.map(|(at, _)| at).into_iter().collect()
        }

        TargetSelector::All => ctx.eligible(),

        TargetSelector::Dead => ctx
            .members()
            .filter(|(at, c)| c.is_in_combat() && c.dead && !ctx.is_excluded(*at))
            .map(|(at, _)| at)
            .collect(),
    }
}
