//! Decoded combat outcome events.
//!
//! Events are produced once per submitted turn by the ledger layer's receipt
//! decoder and consumed exactly once by the replay scheduler. Their order is
//! the authoritative causal order and is never changed downstream.

use crate::ids::{BattleId, PlayerAddress, Side};

/// One authoritative combat outcome, normalized from a raw receipt entry.
///
/// `from_idx`/`to_idx` are logical roster positions valid against the roster
/// snapshot captured when the turn was submitted; `is_monster` flags the side
/// of the event's source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CombatEvent {
    Damage {
        battle_id: BattleId,
        from_idx: u8,
        to_idx: u8,
        damage: u32,
        critical_hit: bool,
        is_monster: bool,
    },
    Buff {
        battle_id: BattleId,
        from_idx: u8,
        to_idx: u8,
        buff_id: u8,
        amount: u32,
        is_monster: bool,
    },
    Debuff {
        battle_id: BattleId,
        from_idx: u8,
        to_idx: u8,
        debuff_id: u8,
        amount: u32,
        is_monster: bool,
    },
    Heal {
        battle_id: BattleId,
        from_idx: u8,
        to_idx: u8,
        amount: u32,
        is_monster: bool,
    },
    Miss {
        battle_id: BattleId,
        from_idx: u8,
        to_idx: u8,
        is_monster: bool,
    },
    Victory {
        battle_id: BattleId,
        player: PlayerAddress,
    },
    Defeat {
        battle_id: BattleId,
        player: PlayerAddress,
    },
}

/// How a finished battle ended, from the acting player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

impl CombatEvent {
    pub fn battle_id(&self) -> BattleId {
        match *self {
            CombatEvent::Damage { battle_id, .. }
            | CombatEvent::Buff { battle_id, .. }
            | CombatEvent::Debuff { battle_id, .. }
            | CombatEvent::Heal { battle_id, .. }
            | CombatEvent::Miss { battle_id, .. }
            | CombatEvent::Victory { battle_id, .. }
            | CombatEvent::Defeat { battle_id, .. } => battle_id,
        }
    }

    /// Logical source position, absent for terminal events.
    pub fn source(&self) -> Option<(Side, u8)> {
        match *self {
            CombatEvent::Damage {
                from_idx,
                is_monster,
                ..
            }
            | CombatEvent::Buff {
                from_idx,
                is_monster,
                ..
            }
            | CombatEvent::Debuff {
                from_idx,
                is_monster,
                ..
            }
            | CombatEvent::Heal {
                from_idx,
                is_monster,
                ..
            }
            | CombatEvent::Miss {
                from_idx,
                is_monster,
                ..
            } => Some((Side::from_is_monster(is_monster), from_idx)),
            CombatEvent::Victory { .. } | CombatEvent::Defeat { .. } => None,
        }
    }

    /// Logical target position, absent for terminal events.
    ///
    /// Buffs and heals stay within the source's side; damage, debuffs, and
    /// misses land on the opposite side.
    pub fn target(&self) -> Option<(Side, u8)> {
        let source_side = Side::from_is_monster(match *self {
            CombatEvent::Damage { is_monster, .. }
            | CombatEvent::Buff { is_monster, .. }
            | CombatEvent::Debuff { is_monster, .. }
            | CombatEvent::Heal { is_monster, .. }
            | CombatEvent::Miss { is_monster, .. } => is_monster,
            CombatEvent::Victory { .. } | CombatEvent::Defeat { .. } => return None,
        });
        match *self {
            CombatEvent::Buff { to_idx, .. } | CombatEvent::Heal { to_idx, .. } => {
                Some((source_side, to_idx))
            }
            CombatEvent::Damage { to_idx, .. }
            | CombatEvent::Debuff { to_idx, .. }
            | CombatEvent::Miss { to_idx, .. } => Some((source_side.opposite(), to_idx)),
            CombatEvent::Victory { .. } | CombatEvent::Defeat { .. } => None,
        }
    }

    /// Terminal events end the battle session and suppress resynchronization.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CombatEvent::Victory { .. } | CombatEvent::Defeat { .. }
        )
    }
}

/// Pre-scan an event list for a terminal outcome.
///
/// Decided before playback starts, not by waiting for the terminal event's
/// timer to fire.
pub fn terminal_outcome(events: &[CombatEvent]) -> Option<BattleOutcome> {
    events.iter().find_map(|event| match event {
        CombatEvent::Victory { .. } => Some(BattleOutcome::Victory),
        CombatEvent::Defeat { .. } => Some(BattleOutcome::Defeat),
        _ => None,
    })
}
