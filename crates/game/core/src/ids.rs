use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one battle session, assigned by the ledger at creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BattleId(pub u32);

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "battle#{}", self.0)
    }
}

/// Stable identifier of a character, persistent across the whole battle.
///
/// Logical roster positions shift as characters die; this id never does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Global skill identifier as known to the ledger and the catalog.
///
/// Not to be confused with [`crate::action::SkillSlot`], the per-actor slot
/// position used on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u8);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skill#{}", self.0)
    }
}

/// On-chain account address of a player, kept in its textual form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerAddress(pub String);

impl fmt::Display for PlayerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which roster a character belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Side {
    Hero,
    Monster,
}

impl Side {
    /// Construct from the receipt's side-of-source flag.
    pub fn from_is_monster(is_monster: bool) -> Self {
        if is_monster { Side::Monster } else { Side::Hero }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Hero => Side::Monster,
            Side::Monster => Side::Hero,
        }
    }

    /// True for the roster controlled by the opposing player program.
    pub fn is_monster(self) -> bool {
        matches!(self, Side::Monster)
    }
}
