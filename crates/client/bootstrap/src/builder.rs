//! Battle session assembly.
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use battle_core::BattleId;
use client_blockchain_core::{BattleReader, LedgerClient};
use client_frontend_core::{BattleSession, SessionEvent, StageDirector};

use crate::config::ClientConfig;

/// Everything a front-end needs to present one battle.
pub struct SessionSetup {
    pub config: ClientConfig,
    pub session: BattleSession,
    pub events_rx: mpsc::Receiver<SessionEvent>,
}

/// Assembles a loaded [`BattleSession`] from transport and stage collaborators.
pub struct SessionBuilder {
    config: ClientConfig,
    ledger: Arc<dyn LedgerClient>,
    reader: Arc<dyn BattleReader>,
}

impl SessionBuilder {
    pub fn new(
        config: ClientConfig,
        ledger: Arc<dyn LedgerClient>,
        reader: Arc<dyn BattleReader>,
    ) -> Self {
        Self {
            config,
            ledger,
            reader,
        }
    }

    /// Create a fresh battle on the ledger, then attach to it.
    pub async fn start_battle(self, stage: Arc<dyn StageDirector>) -> Result<SessionSetup> {
        let created = self
            .ledger
            .start_battle(self.config.battle_level)
            .await
            .context("failed to start battle")?;
        tracing::info!(
            target: "bootstrap",
            battle = %created.battle_id,
            tx = %created.transaction_hash,
            "battle created"
        );
        self.attach(created.battle_id, stage).await
    }

    /// Attach to an existing battle and perform the initial load.
    pub async fn attach(
        self,
        battle_id: BattleId,
        stage: Arc<dyn StageDirector>,
    ) -> Result<SessionSetup> {
        let (events_tx, events_rx) = mpsc::channel(self.config.event_buffer);
        let mut session = BattleSession::new(
            battle_id,
            self.ledger,
            self.reader,
            stage,
            self.config.replay_timing(),
            events_tx,
        );
        session
            .load()
            .await
            .with_context(|| format!("failed to load {battle_id}"))?;

        Ok(SessionSetup {
            config: self.config,
            session,
            events_rx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use client_blockchain_core::mock::{MockLedger, demo_world};
    use client_frontend_core::RecordingStage;

    #[tokio::test]
    async fn start_battle_builds_a_loaded_session() {
        let ledger = MockLedger::new(demo_world(3));
        let builder = SessionBuilder::new(
            ClientConfig::default(),
            Arc::new(ledger.clone()),
            Arc::new(ledger),
        );

        let setup = builder
            .start_battle(Arc::new(RecordingStage::new()))
            .await
            .unwrap();
        assert_eq!(setup.session.view_model().heroes.len(), 3);
        assert!(!setup.session.is_turn_in_flight());
    }
}
