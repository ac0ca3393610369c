//! Party and Encounter - Fixed three-slot formations

use super::Character;
use crate::types::{CharacterRef, Position, Side};

/// Three fixed slots: front, center, back
#[derive(Debug, Clone)]
pub struct Party {
    pub front: Character,
    pub center: Character,
    pub back: Character,
}

impl Party {
    pub fn new(front: Character, center: Character, back: Character) -> Self {
        Party {
            front,
            center,
            back,
        }
    }

    pub fn get(&self, position: Position) -> &Character {
        match position {
            Position::Front => &self.front,
            Position::Center => &self.center,
            Position::Back => &self.back,
        }
    }

    pub fn get_mut(&mut self, position: Position) -> &mut Character {
        match position {
            Position::Front => &mut self.front,
            Position::Center => &mut self.center,
            Position::Back => &mut self.back,
        }
    }

    /// Members in front, center, back order
    pub fn all(&self) -> [&Character; 3] {
        [&self.front, &self.center, &self.back]
    }

    /// Whether any in-combat member is still standing
    pub fn any_alive(&self) -> bool {
        self.all().iter().any(|c| c.is_in_combat() && c.is_alive())
    }
}

/// Both sides of a fight; the arena every [`CharacterRef`] indexes into
#[derive(Debug, Clone)]
pub struct Encounter {
    pub heroes: Party,
    pub enemies: Party,
}

impl Encounter {
    pub fn new(heroes: Party, enemies: Party) -> Self {
        Encounter { heroes, enemies }
    }

    pub fn party(&self, side: Side) -> &Party {
        match side {
            Side::Heroes => &self.heroes,
            Side::Enemies => &self.enemies,
        }
    }

    pub fn party_mut(&mut self, side: Side) -> &mut Party {
        match side {
            Side::Heroes => &mut self.heroes,
            Side::Enemies => &mut self.enemies,
        }
    }

    pub fn get(&self, at: CharacterRef) -> &Character {
        self.party(at.side).get(at.position)
    }

    pub fn get_mut(&mut self, at: CharacterRef) -> &mut Character {
        self.party_mut(at.side).get_mut(at.position)
    }

    /// Follow a back-reference, yielding `None` once the slot no longer
    /// holds a combat participant
    pub fn resolve_source(&self, at: Option<CharacterRef>) -> Option<&Character> {
        at.map(|r| self.get(r)).filter(|c| c.is_in_combat())
    }

    /// Every slot reference, heroes first
    pub fn refs() -> impl Iterator<Item = CharacterRef> {
        [Side::Heroes, Side::Enemies]
            .into_iter()
            .flat_map(|side| Position::ALL.into_iter().map(move |p| CharacterRef::new(side, p)))
    }

    /// Combat is over once either side has no living participant
    pub fn is_finished(&self) -> bool {
        !self.heroes.any_alive() || !self.enemies.any_alive()
    }
}
