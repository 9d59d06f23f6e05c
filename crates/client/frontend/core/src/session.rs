//! Battle session orchestrator.
//!
//! Owns the turn composer, the view model, and the replay driver, and runs
//! the submit → decode → replay → resync cycle for each completed turn. The
//! session never resolves combat: it snapshots the roster, ships the encoded
//! turn, and plays back whatever the ledger answered.
//!
//! The cycle runs on a spawned task; the front-end keeps handling input and
//! hears back through [`SessionEvent`]s. A single in-flight guard makes the
//! auto-submit trigger fire exactly once per completed turn and blocks the
//! next turn until the previous replay has fully resolved.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use battle_core::{BattleId, BattleOutcome, EncodedAction, RosterSnapshot, Side, SkillId};
use client_blockchain_core::{
    BattleReader, LedgerClient, TurnSubmitter, decode_receipt,
};

use crate::replay::{ReplayCompletion, ReplayDriver, ReplayPlan, ReplayTiming};
use crate::stage::StageDirector;
use crate::turn::TurnComposer;
use crate::view_model::BattleViewModel;

/// What the session reports back to its front-end.
#[derive(Debug)]
pub enum SessionEvent {
    /// The turn was rejected or never confirmed; the pending selection is
    /// preserved so the player can retry without re-selecting.
    SubmissionFailed { message: String },

    /// The receipt confirmed and playback began.
    ReplayStarted { event_count: usize },

    /// Non-terminal replay finished and the resynchronization read completed;
    /// apply the fresh view model and start the next turn.
    TurnResolved { view_model: BattleViewModel },

    /// Non-terminal replay finished but the resynchronization read failed;
    /// the next turn starts over stale-but-present data.
    ResyncFailed { message: String },

    /// A terminal event played out; the battle screen is done.
    BattleOver { outcome: BattleOutcome },
}

/// One battle from the client's point of view.
pub struct BattleSession {
    battle_id: BattleId,
    reader: Arc<dyn BattleReader>,
    submitter: TurnSubmitter,
    driver: ReplayDriver,
    timing: ReplayTiming,
    composer: TurnComposer,
    view_model: BattleViewModel,
    in_flight: bool,
    events_tx: mpsc::Sender<SessionEvent>,
    turn_task: Option<JoinHandle<()>>,
}

impl BattleSession {
    pub fn new(
        battle_id: BattleId,
        ledger: Arc<dyn LedgerClient>,
        reader: Arc<dyn BattleReader>,
        stage: Arc<dyn StageDirector>,
        timing: ReplayTiming,
        events_tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            battle_id,
            reader,
            submitter: TurnSubmitter::new(ledger),
            driver: ReplayDriver::new(stage),
            timing,
            composer: TurnComposer::new(&[]),
            view_model: BattleViewModel::default(),
            in_flight: false,
            events_tx,
            turn_task: None,
        }
    }

    /// Initial load: battle record plus per-character statuses.
    pub async fn load(&mut self) -> Result<(), client_blockchain_core::QueryError> {
        let view_model = BattleViewModel::load(self.reader.as_ref(), self.battle_id).await?;
        self.composer = TurnComposer::new(&view_model.living_heroes());
        self.view_model = view_model;
        tracing::info!(
            target: "frontend::session",
            battle = %self.battle_id,
            heroes = self.view_model.heroes.len(),
            monsters = self.view_model.monsters.len(),
            "battle loaded"
        );
        Ok(())
    }

    pub fn battle_id(&self) -> BattleId {
        self.battle_id
    }

    pub fn view_model(&self) -> &BattleViewModel {
        &self.view_model
    }

    pub fn composer(&self) -> &TurnComposer {
        &self.composer
    }

    /// True while a submission/replay cycle for the previous turn is running.
    pub fn is_turn_in_flight(&self) -> bool {
        self.in_flight
    }

    // ------------------------------------------------------------------
    // Selection input
    // ------------------------------------------------------------------

    pub fn select_actor(&mut self, actor_index: u8) -> bool {
        if self.in_flight {
            return false;
        }
        self.composer.select_actor(actor_index)
    }

    pub fn select_skill(&mut self, skill: SkillId) -> bool {
        if self.in_flight {
            return false;
        }
        self.composer.select_skill(skill)
    }

    /// Final selection step; completing the last actor's action auto-submits
    /// the turn, exactly once.
    pub fn select_target(&mut self, side: Side, target_index: u8) -> bool {
        if self.in_flight {
            return false;
        }
        let advanced = self.composer.select_target(side, target_index);
        if advanced && self.composer.is_complete() {
            self.submit_turn();
        }
        advanced
    }

    pub fn reset_turn(&mut self) {
        if !self.in_flight {
            self.composer.reset();
        }
    }

    /// Submit the turn as it stands, encoding unassigned actors to the no-op
    /// sentinel. Normal play never needs this; it exists for surfaces that
    /// let the player end the turn early.
    pub fn force_submit(&mut self) -> bool {
        self.submit_turn()
    }

    fn submit_turn(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        let actions = match self.composer.encoded_actions() {
            Ok(actions) => actions,
            Err(error) => {
                tracing::error!(
                    target: "frontend::session",
                    %error,
                    "turn failed to encode"
                );
                return false;
            }
        };
        if actions.is_empty() {
            return false;
        }

        // Roster frozen here, before the ledger answers: every event index in
        // the receipt resolves against this snapshot, never a refreshed one.
        let roster = self.view_model.roster_snapshot();
        self.in_flight = true;

        let cycle = TurnCycle {
            battle_id: self.battle_id,
            submitter: self.submitter.clone(),
            reader: Arc::clone(&self.reader),
            driver: self.driver.clone(),
            timing: self.timing,
            events_tx: self.events_tx.clone(),
        };
        self.turn_task = Some(tokio::spawn(cycle.run(actions, roster)));
        true
    }

    // ------------------------------------------------------------------
    // Event acknowledgements from the front-end
    // ------------------------------------------------------------------

    /// Submission failed: the pending selection survives for a retry.
    pub fn acknowledge_failure(&mut self) {
        self.in_flight = false;
    }

    /// Fresh post-turn state arrived: swap it in and open the next turn.
    pub fn apply_resync(&mut self, view_model: BattleViewModel) {
        self.composer = TurnComposer::new(&view_model.living_heroes());
        self.view_model = view_model;
        self.in_flight = false;
    }

    /// Resynchronization failed: next turn runs over stale-but-present data.
    pub fn acknowledge_stale_resync(&mut self) {
        let heroes = self.view_model.living_heroes();
        self.composer = TurnComposer::new(&heroes);
        self.in_flight = false;
    }

    pub fn mark_finished(&mut self) {
        self.view_model.is_finished = true;
    }

    /// Cancel any in-flight replay and drop its remaining timers. Must be
    /// called when the hosting screen goes away.
    pub fn teardown(&mut self) {
        self.driver.cancel();
        if let Some(task) = self.turn_task.take() {
            task.abort();
        }
    }
}

impl Drop for BattleSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Everything one submit/replay cycle needs, detached from the session so it
/// can run while input keeps flowing.
struct TurnCycle {
    battle_id: BattleId,
    submitter: TurnSubmitter,
    reader: Arc<dyn BattleReader>,
    driver: ReplayDriver,
    timing: ReplayTiming,
    events_tx: mpsc::Sender<SessionEvent>,
}

impl TurnCycle {
    async fn run(self, actions: Vec<EncodedAction>, roster: RosterSnapshot) {
        let receipt = match self.submitter.submit(&actions, roster.hero_count()).await {
            Ok(receipt) => receipt,
            Err(error) => {
                tracing::warn!(
                    target: "frontend::session",
                    %error,
                    "turn submission failed"
                );
                self.send(SessionEvent::SubmissionFailed {
                    message: error.to_string(),
                })
                .await;
                return;
            }
        };

        let events = decode_receipt(&receipt);
        let plan = ReplayPlan::build(&events, &roster, &self.timing);
        self.send(SessionEvent::ReplayStarted {
            event_count: events.len(),
        })
        .await;

        match self.driver.run(plan).await {
            ReplayCompletion::Cancelled => {}
            ReplayCompletion::Finished(Some(outcome)) => {
                tokio::time::sleep(self.timing.redirect_delay).await;
                self.send(SessionEvent::BattleOver { outcome }).await;
            }
            ReplayCompletion::Finished(None) => {
                match BattleViewModel::load(self.reader.as_ref(), self.battle_id).await {
                    Ok(view_model) => {
                        self.send(SessionEvent::TurnResolved { view_model }).await;
                    }
                    Err(error) => {
                        tracing::warn!(
                            target: "frontend::session",
                            %error,
                            "resynchronization read failed"
                        );
                        self.send(SessionEvent::ResyncFailed {
                            message: error.to_string(),
                        })
                        .await;
                    }
                }
            }
        }
    }

    async fn send(&self, event: SessionEvent) {
        if self.events_tx.send(event).await.is_err() {
            tracing::debug!(
                target: "frontend::session",
                "session event receiver gone"
            );
        }
    }
}
