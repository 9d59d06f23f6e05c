//! Turn wire encoding.
//!
//! Every living hero submits one action per turn, packed into a single
//! three-digit integer: hundreds digit = actor index, tens digit = target
//! index, ones digit = skill slot. Slots are 1-based positions within the
//! actor's skill list, which keeps `0` free as the "no action" sentinel.

use crate::ids::{CharacterId, SkillId};
use crate::skill::skills_of_character;

/// Errors raised while packing an action for the wire.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionEncodeError {
    #[error("actor index {0} does not fit in one digit")]
    ActorIndexOutOfRange(u8),

    #[error("target index {0} does not fit in one digit")]
    TargetIndexOutOfRange(u8),

    #[error("character {character} has no skill {skill}")]
    SkillNotAvailable {
        character: CharacterId,
        skill: SkillId,
    },
}

/// 1-based position of a skill within an actor's skill list.
///
/// The ledger addresses skills by slot, not by global id; the selection layer
/// resolves the player's chosen [`SkillId`] to a slot before encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SkillSlot(u8);

impl SkillSlot {
    /// Resolve a character's global skill id to its slot position.
    pub fn of(character: CharacterId, skill: SkillId) -> Option<Self> {
        skills_of_character(character)
            .iter()
            .position(|id| *id == skill)
            .map(|pos| Self(pos as u8 + 1))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// One actor's choice for the current turn, built up across the selection
/// steps and discarded after encoding or on reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingAction {
    pub actor_index: u8,
    pub skill: SkillId,
    pub target_index: u8,
}

/// Compact integer wire form of one actor's turn action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EncodedAction(u16);

impl EncodedAction {
    /// Sentinel for an actor submitted without an assignment; the ledger
    /// treats it as "no action".
    pub const NO_ACTION: Self = Self(0);

    /// Pack `(actor, slot, target)` into the positional scheme.
    ///
    /// Indices are single-digit roster positions; the slot is already 1-based
    /// so the result is never zero for a real action.
    pub fn encode(
        actor_index: u8,
        slot: SkillSlot,
        target_index: u8,
    ) -> Result<Self, ActionEncodeError> {
        if actor_index > 9 {
            return Err(ActionEncodeError::ActorIndexOutOfRange(actor_index));
        }
        if target_index > 9 {
            return Err(ActionEncodeError::TargetIndexOutOfRange(target_index));
        }
        Ok(Self(
            u16::from(actor_index) * 100 + u16::from(target_index) * 10 + u16::from(slot.get()),
        ))
    }

    /// Resolve a pending action against the actor's skill list and pack it.
    pub fn from_pending(
        actor: CharacterId,
        pending: PendingAction,
    ) -> Result<Self, ActionEncodeError> {
        let slot = SkillSlot::of(actor, pending.skill).ok_or({
            ActionEncodeError::SkillNotAvailable {
                character: actor,
                skill: pending.skill,
            }
        })?;
        Self::encode(pending.actor_index, slot, pending.target_index)
    }

    /// Decompose for display. Not used on any correctness path.
    pub fn actor_index(self) -> u8 {
        (self.0 / 100) as u8
    }

    pub fn target_index(self) -> u8 {
        (self.0 / 10 % 10) as u8
    }

    pub fn skill_slot(self) -> u8 {
        (self.0 % 10) as u8
    }

    pub fn is_no_action(self) -> bool {
        self.0 == 0
    }

    /// Three-digit zero-padded decimal string, the ledger call format.
    pub fn wire(self) -> String {
        format!("{:03}", self.0)
    }
}

impl std::fmt::Display for EncodedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.wire())
    }
}
