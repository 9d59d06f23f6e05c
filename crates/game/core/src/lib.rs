//! Battle domain types shared across client layers.
//!
//! `battle-core` defines the canonical battle vocabulary (identifiers, the
//! skill catalog, the turn wire encoding, decoded combat events, and roster
//! snapshots) as pure data with no I/O or async machinery. The ledger layer
//! produces these types from raw receipts and the presentation layer consumes
//! them; neither side resolves combat. Outcomes only ever arrive from the
//! ledger.
pub mod action;
pub mod event;
pub mod ids;
pub mod roster;
pub mod skill;
pub mod status;

pub use action::{ActionEncodeError, EncodedAction, PendingAction, SkillSlot};
pub use event::{BattleOutcome, CombatEvent, terminal_outcome};
pub use ids::{BattleId, CharacterId, PlayerAddress, SkillId, Side};
pub use roster::RosterSnapshot;
pub use skill::{Skill, TargetClass, skill_by_id, skills_of_character};
pub use status::{BattleSummary, CharacterStatus, CombatStats};
