//! Cross-frontend battle presentation primitives.
//!
//! Houses the turn selection state machine, the stage capability traits, the
//! replay scheduler, and the battle session orchestrator that both the CLI
//! and future graphical clients reuse. Nothing in here resolves combat: the
//! session submits turns, decodes receipts, and replays the ledger's verdict.
pub mod message;
pub mod replay;
pub mod session;
pub mod stage;
pub mod turn;
pub mod view_model;

pub use message::{MessageEntry, MessageLevel, MessageLog};
pub use replay::{Effect, ReplayCompletion, ReplayDriver, ReplayPlan, ReplayTiming, TimedEffect};
pub use session::{BattleSession, SessionEvent};
pub use stage::{Anchor, FloatTone, FloatingText, RecordingStage, SoundCue, SpriteMood, StageDirector};
pub use turn::{SelectionPhase, TurnComposer};
pub use view_model::{ActorView, BattleViewModel};
