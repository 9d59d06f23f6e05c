//! In-memory ledger backend for tests and offline play.
//!
//! `MockLedger` does not resolve combat. It replays pre-scripted receipts,
//! one per submitted turn, and applies the scripted magnitudes to its own
//! world so that post-replay resynchronization reads observe them. Characters
//! whose hit points reach zero are removed from the roster, exactly as the
//! real ledger confirms removals.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use battle_core::{
    BattleId, BattleSummary, CharacterId, CharacterStatus, CombatEvent, PlayerAddress, Side,
};

use crate::decode::decode_receipt;
use crate::traits::{BattleReader, LedgerClient, QueryError, SubmitError};
use crate::types::{BattleCreated, RawLogEntry, RawReceipt, TransactionHash};

/// Shared mutable battle world behind the mock backend.
pub struct MockWorld {
    battle: BattleSummary,
    statuses: HashMap<CharacterId, CharacterStatus>,
    script: VecDeque<Vec<RawLogEntry>>,
    fail_next: Option<SubmitError>,
    tx_counter: u64,
}

impl MockWorld {
    pub fn new(battle: BattleSummary, statuses: Vec<CharacterStatus>) -> Self {
        Self {
            battle,
            statuses: statuses
                .into_iter()
                .map(|status| (status.character_id, status))
                .collect(),
            script: VecDeque::new(),
            fail_next: None,
            tx_counter: 0,
        }
    }

    /// Queue the outcome log the next `play` call will confirm with.
    pub fn script_turn(&mut self, entries: Vec<RawLogEntry>) {
        self.script.push_back(entries);
    }

    /// Make the next submission fail with `error` instead of confirming.
    pub fn fail_next_submission(&mut self, error: SubmitError) {
        self.fail_next = Some(error);
    }

    fn next_tx(&mut self) -> TransactionHash {
        self.tx_counter += 1;
        TransactionHash(format!("0x{:x}", self.tx_counter))
    }

    /// Apply one decoded event's magnitude to the status table.
    ///
    /// Indices resolve against the roster as it stood when the turn began,
    /// mirroring the on-chain program's view.
    fn apply_event(&mut self, event: &CombatEvent, heroes: &[CharacterId], monsters: &[CharacterId]) {
        let resolve = |side: Side, index: u8| -> Option<CharacterId> {
            let roster = match side {
                Side::Hero => heroes,
                Side::Monster => monsters,
            };
            roster.get(usize::from(index)).copied()
        };

        match event {
            CombatEvent::Damage { damage, .. } => {
                if let Some((side, index)) = event.target()
                    && let Some(id) = resolve(side, index)
                    && let Some(status) = self.statuses.get_mut(&id)
                {
                    status.current_hp = status.current_hp.saturating_sub(*damage);
                }
            }
            CombatEvent::Heal { amount, .. } => {
                if let Some((side, index)) = event.target()
                    && let Some(id) = resolve(side, index)
                    && let Some(status) = self.statuses.get_mut(&id)
                {
                    status.current_hp = (status.current_hp + amount).min(status.max_hp);
                }
            }
            // Stat adjustments do not affect hit points; terminal events and
            // misses change nothing.
            _ => {}
        }
    }

    fn remove_dead(&mut self) {
        let statuses = &self.statuses;
        let alive = |id: &CharacterId| statuses.get(id).is_none_or(CharacterStatus::is_alive);
        self.battle.heroes.retain(alive);
        self.battle.monsters.retain(alive);
    }
}

/// Scripted ledger backend; serves both transport traits.
#[derive(Clone)]
pub struct MockLedger {
    world: Arc<Mutex<MockWorld>>,
}

impl MockLedger {
    pub fn new(world: MockWorld) -> Self {
        Self {
            world: Arc::new(Mutex::new(world)),
        }
    }

    pub fn world(&self) -> Arc<Mutex<MockWorld>> {
        Arc::clone(&self.world)
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn start_battle(&self, _level: u32) -> Result<BattleCreated, SubmitError> {
        let mut world = self.world.lock().unwrap();
        let tx = world.next_tx();
        Ok(BattleCreated {
            transaction_hash: tx,
            battle_id: world.battle.id,
        })
    }

    async fn play(&self, actions: &[String]) -> Result<RawReceipt, SubmitError> {
        let mut world = self.world.lock().unwrap();

        if let Some(error) = world.fail_next.take() {
            return Err(error);
        }
        if actions.len() != world.battle.heroes.len() {
            return Err(SubmitError::Rejected(format!(
                "expected {} actions, got {}",
                world.battle.heroes.len(),
                actions.len()
            )));
        }

        let entries = world.script.pop_front().unwrap_or_default();
        let receipt = RawReceipt {
            transaction_hash: world.next_tx(),
            entries,
        };

        // Keep the world consistent with what the receipt reports so that
        // resynchronization reads see the post-turn state.
        let heroes = world.battle.heroes.clone();
        let monsters = world.battle.monsters.clone();
        let events = decode_receipt(&receipt);
        for event in &events {
            world.apply_event(event, &heroes, &monsters);
        }
        world.remove_dead();
        if events.iter().any(CombatEvent::is_terminal) {
            world.battle.is_finished = true;
        }

        Ok(receipt)
    }
}

#[async_trait]
impl BattleReader for MockLedger {
    async fn battle(&self, battle_id: BattleId) -> Result<BattleSummary, QueryError> {
        let world = self.world.lock().unwrap();
        if world.battle.id != battle_id {
            return Err(QueryError::NotFound);
        }
        Ok(world.battle.clone())
    }

    async fn character_status(
        &self,
        battle_id: BattleId,
        character_id: CharacterId,
    ) -> Result<CharacterStatus, QueryError> {
        let world = self.world.lock().unwrap();
        if world.battle.id != battle_id {
            return Err(QueryError::NotFound);
        }
        world
            .statuses
            .get(&character_id)
            .cloned()
            .ok_or(QueryError::NotFound)
    }
}

/// Raw log entry constructors for scripts and fixtures.
pub mod entries {
    use crate::types::{FieldValue, RawLogEntry};

    fn uints(key: &str, values: &[u64]) -> RawLogEntry {
        RawLogEntry {
            key: key.to_owned(),
            data: values.iter().copied().map(FieldValue::Uint).collect(),
        }
    }

    pub fn damage(
        battle_id: u64,
        from_idx: u64,
        to_idx: u64,
        critical_hit: bool,
        damage: u64,
        is_monster: bool,
    ) -> RawLogEntry {
        uints(
            "destiny-DamageEvent",
            &[
                battle_id,
                from_idx,
                to_idx,
                u64::from(critical_hit),
                damage,
                u64::from(is_monster),
            ],
        )
    }

    pub fn buff(
        battle_id: u64,
        from_idx: u64,
        to_idx: u64,
        buff_id: u64,
        amount: u64,
        is_monster: bool,
    ) -> RawLogEntry {
        uints(
            "destiny-BuffEvent",
            &[battle_id, from_idx, to_idx, buff_id, amount, u64::from(is_monster)],
        )
    }

    pub fn debuff(
        battle_id: u64,
        from_idx: u64,
        to_idx: u64,
        debuff_id: u64,
        amount: u64,
        is_monster: bool,
    ) -> RawLogEntry {
        uints(
            "destiny-DebuffEvent",
            &[battle_id, from_idx, to_idx, debuff_id, amount, u64::from(is_monster)],
        )
    }

    pub fn heal(
        battle_id: u64,
        from_idx: u64,
        to_idx: u64,
        amount: u64,
        is_monster: bool,
    ) -> RawLogEntry {
        uints(
            "destiny-HealEvent",
            &[battle_id, from_idx, to_idx, amount, u64::from(is_monster)],
        )
    }

    pub fn miss(battle_id: u64, from_idx: u64, to_idx: u64, is_monster: bool) -> RawLogEntry {
        uints(
            "destiny-MissEvent",
            &[battle_id, from_idx, to_idx, u64::from(is_monster)],
        )
    }

    pub fn victory(battle_id: u64, player: &str) -> RawLogEntry {
        RawLogEntry {
            key: "destiny-PlayerWinEvent".to_owned(),
            data: vec![FieldValue::Uint(battle_id), FieldValue::Text(player.to_owned())],
        }
    }

    pub fn defeat(battle_id: u64, player: &str) -> RawLogEntry {
        RawLogEntry {
            key: "destiny-PlayerLoseEvent".to_owned(),
            data: vec![FieldValue::Uint(battle_id), FieldValue::Text(player.to_owned())],
        }
    }
}

/// A ready-made three-versus-three world for demos and integration tests.
pub fn demo_world(level: u32) -> MockWorld {
    use battle_core::CombatStats;

    let battle_id = BattleId(1);
    let heroes = vec![CharacterId(1), CharacterId(2), CharacterId(3)];
    let monsters = vec![CharacterId(4), CharacterId(5), CharacterId(6)];

    let status = |character_id: CharacterId, hp: u32, attack: u32| CharacterStatus {
        battle_id,
        character_id,
        current_hp: hp,
        max_hp: hp,
        stats: CombatStats {
            attack,
            defense: 10,
            critical_chance: 15,
            evasion: 5,
        },
    };

    let statuses = vec![
        status(CharacterId(1), 120, 18),
        status(CharacterId(2), 90, 25),
        status(CharacterId(3), 150, 14),
        status(CharacterId(4), 80, 20),
        status(CharacterId(5), 100, 16),
        status(CharacterId(6), 140, 22),
    ];

    MockWorld::new(
        BattleSummary {
            id: battle_id,
            level,
            player: PlayerAddress("0xcafe".into()),
            heroes,
            monsters,
            is_finished: false,
        },
        statuses,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_turn_mutates_world_for_resync_reads() {
        let mut world = demo_world(1);
        world.script_turn(vec![
            entries::damage(1, 0, 0, false, 80, false),
            entries::damage(1, 1, 1, true, 50, false),
        ]);
        let ledger = MockLedger::new(world);

        let receipt = ledger
            .play(&["011".into(), "012".into(), "013".into()])
            .await
            .unwrap();
        assert_eq!(receipt.entries.len(), 2);

        // Monster 0 (id 4, 80 hp) died and left the roster.
        let battle = ledger.battle(BattleId(1)).await.unwrap();
        assert_eq!(battle.monsters, vec![CharacterId(5), CharacterId(6)]);

        let dead = ledger
            .character_status(BattleId(1), CharacterId(4))
            .await
            .unwrap();
        assert_eq!(dead.current_hp, 0);
        let wounded = ledger
            .character_status(BattleId(1), CharacterId(5))
            .await
            .unwrap();
        assert_eq!(wounded.current_hp, 50);
    }

    #[tokio::test]
    async fn injected_failure_consumes_one_submission() {
        let mut world = demo_world(1);
        world.fail_next_submission(SubmitError::ConfirmationTimeout);
        let ledger = MockLedger::new(world);

        let actions = vec!["011".to_owned(), "012".to_owned(), "013".to_owned()];
        assert!(matches!(
            ledger.play(&actions).await,
            Err(SubmitError::ConfirmationTimeout)
        ));
        // Next submission goes through (empty script => empty receipt).
        assert!(ledger.play(&actions).await.is_ok());
    }

    #[tokio::test]
    async fn terminal_event_finishes_the_battle() {
        let mut world = demo_world(1);
        world.script_turn(vec![entries::victory(1, "0xcafe")]);
        let ledger = MockLedger::new(world);

        ledger
            .play(&["011".into(), "012".into(), "013".into()])
            .await
            .unwrap();
        assert!(ledger.battle(BattleId(1)).await.unwrap().is_finished);
    }
}
