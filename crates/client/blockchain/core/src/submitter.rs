//! Turn submission façade.
//!
//! Serializes a completed per-actor action set into the ledger's wire format
//! and performs the single confirmation round trip. The receipt comes back
//! untouched; decoding is the caller's next step.

use std::sync::Arc;

use battle_core::EncodedAction;

use crate::traits::{LedgerClient, SubmitError};
use crate::types::RawReceipt;

/// Thin wrapper around the [`LedgerClient`] write path.
#[derive(Clone)]
pub struct TurnSubmitter {
    ledger: Arc<dyn LedgerClient>,
}

impl TurnSubmitter {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Submit one turn and await its confirmation receipt.
    ///
    /// `actions` must hold exactly one entry per living hero, in actor-index
    /// order; `expected_len` is the hero count from the roster snapshot taken
    /// at submission time. A mismatch is a client bug surfaced as a rejected
    /// submission rather than a wrong-length transaction on the wire.
    pub async fn submit(
        &self,
        actions: &[EncodedAction],
        expected_len: usize,
    ) -> Result<RawReceipt, SubmitError> {
        if actions.len() != expected_len {
            return Err(SubmitError::Rejected(format!(
                "expected {expected_len} actions, got {}",
                actions.len()
            )));
        }

        let wire: Vec<String> = actions.iter().map(|action| action.wire()).collect();
        tracing::info!(
            target: "blockchain::submit",
            actions = ?wire,
            "submitting turn"
        );

        let receipt = self.ledger.play(&wire).await?;
        tracing::debug!(
            target: "blockchain::submit",
            tx = %receipt.transaction_hash,
            entries = receipt.entries.len(),
            "turn confirmed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use std::sync::Mutex;

    use battle_core::{CharacterId, PendingAction, SkillId};

    use crate::traits::LedgerClient;
    use crate::types::{BattleCreated, TransactionHash};

    /// Captures the wire strings it is asked to play.
    #[derive(Default)]
    struct CapturingLedger {
        played: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl LedgerClient for CapturingLedger {
        async fn start_battle(&self, _level: u32) -> Result<BattleCreated, SubmitError> {
            Err(SubmitError::NoSigner)
        }

        async fn play(&self, actions: &[String]) -> Result<RawReceipt, SubmitError> {
            self.played.lock().unwrap().push(actions.to_vec());
            Ok(RawReceipt {
                transaction_hash: TransactionHash("0x1".into()),
                entries: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn formats_zero_padded_wire_strings() {
        let ledger = Arc::new(CapturingLedger::default());
        let submitter = TurnSubmitter::new(ledger.clone());

        let actions = vec![
            EncodedAction::from_pending(
                CharacterId(2),
                PendingAction {
                    actor_index: 0,
                    skill: SkillId(1),
                    target_index: 1,
                },
            )
            .unwrap(),
            EncodedAction::NO_ACTION,
        ];
        submitter.submit(&actions, 2).await.unwrap();

        let played = ledger.played.lock().unwrap();
        assert_eq!(played.as_slice(), &[vec!["011".to_owned(), "000".to_owned()]]);
    }

    #[tokio::test]
    async fn wrong_action_count_never_reaches_the_wire() {
        let ledger = Arc::new(CapturingLedger::default());
        let submitter = TurnSubmitter::new(ledger.clone());

        let result = submitter.submit(&[EncodedAction::NO_ACTION], 3).await;
        assert!(matches!(result, Err(SubmitError::Rejected(_))));
        assert!(ledger.played.lock().unwrap().is_empty());
    }
}
