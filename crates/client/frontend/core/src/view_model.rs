//! Presentation-optimized battle state.
//!
//! Rebuilt from ledger reads only: hit points and stats never change by
//! local computation. The heroes/monsters vectors are ordered; logical event
//! indices count into them, and [`BattleViewModel::roster_snapshot`] freezes
//! that ordering for a submitted turn.

use battle_core::{
    BattleId, CharacterId, CharacterStatus, CombatStats, PlayerAddress, RosterSnapshot, Side,
};
use client_blockchain_core::{BattleReader, QueryError};

/// One character as the surface renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorView {
    pub id: CharacterId,
    pub name: String,
    pub side: Side,
    pub current_hp: u32,
    pub max_hp: u32,
    pub stats: CombatStats,
}

impl ActorView {
    fn from_status(name: String, side: Side, status: &CharacterStatus) -> Self {
        Self {
            id: status.character_id,
            name,
            side,
            current_hp: status.current_hp,
            max_hp: status.max_hp,
            stats: status.stats,
        }
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        (f64::from(self.current_hp) / f64::from(self.max_hp)).min(1.0)
    }
}

/// Stateful view model owned by the battle session.
#[derive(Clone, Debug, Default)]
pub struct BattleViewModel {
    pub battle_id: BattleId,
    pub level: u32,
    pub player: PlayerAddress,
    pub heroes: Vec<ActorView>,
    pub monsters: Vec<ActorView>,
    pub is_finished: bool,
}

impl BattleViewModel {
    /// Read the full battle state: the roster record plus one status read per
    /// living character. Used for the initial load and for post-replay
    /// resynchronization alike.
    pub async fn load(reader: &dyn BattleReader, battle_id: BattleId) -> Result<Self, QueryError> {
        let battle = reader.battle(battle_id).await?;

        let mut heroes = Vec::with_capacity(battle.heroes.len());
        for id in &battle.heroes {
            let status = reader.character_status(battle_id, *id).await?;
            heroes.push(ActorView::from_status(display_name(*id), Side::Hero, &status));
        }

        let mut monsters = Vec::with_capacity(battle.monsters.len());
        for id in &battle.monsters {
            let status = reader.character_status(battle_id, *id).await?;
            monsters.push(ActorView::from_status(
                display_name(*id),
                Side::Monster,
                &status,
            ));
        }

        Ok(Self {
            battle_id,
            level: battle.level,
            player: battle.player,
            heroes,
            monsters,
            is_finished: battle.is_finished,
        })
    }

    pub fn side(&self, side: Side) -> &[ActorView] {
        match side {
            Side::Hero => &self.heroes,
            Side::Monster => &self.monsters,
        }
    }

    pub fn actor(&self, side: Side, index: u8) -> Option<&ActorView> {
        self.side(side).get(usize::from(index))
    }

    /// Ordered currently-alive id lists; the session captures this at
    /// submission time and holds it for the whole replay. The ledger drops
    /// the dead from its roster record, so the filter only matters when a
    /// status read lags the record.
    pub fn roster_snapshot(&self) -> RosterSnapshot {
        let alive = |actors: &[ActorView]| {
            actors
                .iter()
                .filter(|actor| actor.current_hp > 0)
                .map(|actor| actor.id)
                .collect()
        };
        RosterSnapshot::new(alive(&self.heroes), alive(&self.monsters))
    }

    /// Living hero ids in actor-index order, the composer's roster.
    pub fn living_heroes(&self) -> Vec<CharacterId> {
        self.heroes
            .iter()
            .filter(|actor| actor.current_hp > 0)
            .map(|actor| actor.id)
            .collect()
    }
}

/// Display names for the stock cast; the ledger only stores ids.
fn display_name(id: CharacterId) -> String {
    match id.0 {
        1 => "Angel".to_owned(),
        2 => "Mage".to_owned(),
        3 => "Hero".to_owned(),
        4 => "Caster".to_owned(),
        5 => "Skeleton".to_owned(),
        6 => "Drake".to_owned(),
        7 => "Dark Lord".to_owned(),
        other => format!("Character {other}"),
    }
}
