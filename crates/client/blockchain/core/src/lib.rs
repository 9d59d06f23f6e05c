//! Ledger abstraction layer for the battle client.
//!
//! The ledger program resolves combat; this crate only talks to it. It is
//! split the same way as the rest of the client:
//!
//! ```text
//! Layer 1: TurnSubmitter (wire formatting + single round trip)
//!          decode_receipt (raw log entries -> typed CombatEvents)
//!
//! Layer 0: LedgerClient / BattleReader (transport traits)
//! ```
//!
//! Implementations of the transport traits live outside this crate; the
//! in-memory [`mock`] backend ships here because both the binary's offline
//! mode and downstream crate tests drive it.

pub mod decode;
pub mod mock;
pub mod submitter;
pub mod traits;
pub mod types;

pub use decode::decode_receipt;
pub use mock::{MockLedger, MockWorld};
pub use submitter::TurnSubmitter;
pub use traits::{BattleReader, LedgerClient, QueryError, SubmitError};
pub use types::{BattleCreated, FieldValue, RawLogEntry, RawReceipt, TransactionHash};
