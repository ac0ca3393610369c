//! Core identifiers and small enums shared across the engine

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier for a stat (e.g. "strength", "hitpoints")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatId(pub String);

impl StatId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatId {
    fn from(s: &str) -> Self {
        StatId(s.to_string())
    }
}

impl From<String> for StatId {
    fn from(s: String) -> Self {
        StatId(s)
    }
}

impl Borrow<str> for StatId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Well-known stat ids the engine reads directly
pub mod stats {
    /// Maximum hitpoints
    pub const HITPOINTS: &str = "hitpoints";
}

/// Which party a character belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Heroes,
    Enemies,
}

impl Side {
    /// The other side of the encounter
    pub fn opponent(self) -> Side {
        match self {
            Side::Heroes => Side::Enemies,
            Side::Enemies => Side::Heroes,
        }
    }
}

/// Party slot, in publish order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Front,
    Center,
    Back,
}

impl Position {
    /// All slots in publish order
    pub const ALL: [Position; 3] = [Position::Front, Position::Center, Position::Back];

    /// Slot order tried when this slot cannot be targeted
    pub fn fallback_order(self) -> [Position; 3] {
        match self {
            Position::Front => [Position::Front, Position::Center, Position::Back],
            Position::Center => [Position::Center, Position::Front, Position::Back],
            Position::Back => [Position::Back, Position::Center, Position::Front],
        }
    }

    pub fn index(self) -> usize {
        match self {
            Position::Front => 0,
            Position::Center => 1,
            Position::Back => 2,
        }
    }
}

/// Stable reference to a character slot in an encounter
///
/// Used wherever one character points at another (aura attribution, effect
/// context roles) so no owning reference is ever held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterRef {
    pub side: Side,
    pub position: Position,
}

impl CharacterRef {
    pub fn new(side: Side, position: Position) -> Self {
        CharacterRef { side, position }
    }

    pub fn hero(position: Position) -> Self {
        Self::new(Side::Heroes, position)
    }

    pub fn enemy(position: Position) -> Self {
        Self::new(Side::Enemies, position)
    }

    /// Arena index: heroes 0-2, enemies 3-5
    pub fn index(self) -> u8 {
        let offset = match self.side {
            Side::Heroes => 0,
            Side::Enemies => 3,
        };
        offset + self.position.index() as u8
    }

    /// Inverse of [`CharacterRef::index`]; out-of-range indices yield `None`
    pub fn from_index(index: u8) -> Option<Self> {
        let side = match index {
            0..=2 => Side::Heroes,
            3..=5 => Side::Enemies,
            _ => return None,
        };
        let position = Position::ALL[(index % 3) as usize];
        Some(CharacterRef { side, position })
    }
}

/// Equipment slot for gear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Offhand,
    Head,
    Body,
    Hands,
    Legs,
    Feet,
    Cape,
    Amulet,
    Ring,
}

impl EquipmentSlot {
    /// Get all equipment slots
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Weapon,
            EquipmentSlot::Offhand,
            EquipmentSlot::Head,
            EquipmentSlot::Body,
            EquipmentSlot::Hands,
            EquipmentSlot::Legs,
            EquipmentSlot::Feet,
            EquipmentSlot::Cape,
            EquipmentSlot::Amulet,
            EquipmentSlot::Ring,
        ]
    }
}

/// When an effect fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Fires as soon as the owning ability/action is invoked
    #[default]
    Immediate,
    /// Always on; folded into the stat aggregation pass
    Passive,
    TurnStart,
    TurnEnd,
    RoundStart,
    RoundEnd,
    EncounterStart,
    EncounterEnd,
    BeforeDamageDelivered,
    AfterDamageDelivered,
    BeforeDamageReceived,
    AfterDamageReceived,
    Death,
    /// Unrecognised trigger name; never fires
    #[serde(other)]
    Other,
}

/// Scope a usage limit is counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitScope {
    Combat,
    Round,
    Turn,
}

/// Which party positional selectors are resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyScope {
    Ally,
    Enemy,
}
