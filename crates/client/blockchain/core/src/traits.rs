//! Ledger transport traits.
//!
//! Two concerns, two traits: [`LedgerClient`] is the write path (signed
//! transactions, confirmation receipts), [`BattleReader`] is the read-only
//! query surface used for initial load and post-replay resynchronization.
//! Neither trait knows anything about presentation.

use async_trait::async_trait;

use battle_core::{BattleId, BattleSummary, CharacterId, CharacterStatus};

use crate::types::{BattleCreated, RawReceipt};

/// Turn submission failures, all scoped to the current turn.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("no signer available")]
    NoSigner,

    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("confirmation timed out")]
    ConfirmationTimeout,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Read-path failures.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("record not found")]
    NotFound,

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Write path to the ledger program.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Create a new battle for the given level.
    async fn start_battle(&self, level: u32) -> Result<BattleCreated, SubmitError>;

    /// Submit one turn: one wire-encoded action string per living hero, in
    /// actor-index order. Suspends for the full round trip and resolves with
    /// the raw confirmation receipt.
    async fn play(&self, actions: &[String]) -> Result<RawReceipt, SubmitError>;
}

/// Read-only battle/character queries.
#[async_trait]
pub trait BattleReader: Send + Sync {
    /// Fetch a battle's roster and status by id.
    async fn battle(&self, battle_id: BattleId) -> Result<BattleSummary, QueryError>;

    /// Fetch one character's current per-battle status.
    async fn character_status(
        &self,
        battle_id: BattleId,
        character_id: CharacterId,
    ) -> Result<CharacterStatus, QueryError>;
}
