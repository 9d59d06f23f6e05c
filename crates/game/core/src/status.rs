//! Read-model mirrors of the ledger's battle and character records.
//!
//! These are query results, never mutated locally: hit points and stats only
//! change by re-reading them after a replay completes.

use serde::{Deserialize, Serialize};

use crate::ids::{BattleId, CharacterId, PlayerAddress};

/// Offensive/defensive stat block of one character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub critical_chance: u32,
    pub evasion: u32,
}

/// Per-battle status of one character, keyed by battle + character id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStatus {
    pub battle_id: BattleId,
    pub character_id: CharacterId,
    pub current_hp: u32,
    pub max_hp: u32,
    pub stats: CombatStats,
}

impl CharacterStatus {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Fill ratio for health bars, clamped to 1.0.
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        (f64::from(self.current_hp) / f64::from(self.max_hp)).min(1.0)
    }
}

/// One battle record: who fights whom, and whether it is over.
///
/// The id lists are ordered; logical event indices count into them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub id: BattleId,
    pub level: u32,
    pub player: PlayerAddress,
    pub heroes: Vec<CharacterId>,
    pub monsters: Vec<CharacterId>,
    pub is_finished: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_ratio_clamps_and_handles_zero_max() {
        let mut status = CharacterStatus {
            battle_id: BattleId(1),
            character_id: CharacterId(1),
            current_hp: 50,
            max_hp: 100,
            stats: CombatStats::default(),
        };
        assert!((status.hp_ratio() - 0.5).abs() < f64::EPSILON);

        status.current_hp = 120;
        assert!((status.hp_ratio() - 1.0).abs() < f64::EPSILON);

        status.max_hp = 0;
        assert!(status.hp_ratio() == 0.0);

        status.current_hp = 0;
        assert!(!status.is_alive());
    }
}
