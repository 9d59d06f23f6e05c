//! Stage capabilities: the rendering/audio surface the replay drives.
//!
//! The core only calls these; terminals, windows, or test doubles implement
//! them. All methods are fire-and-forget and must be cheap, since they run on the
//! replay timer path.

use std::sync::Mutex;

use tokio::time::{Duration, Instant};

use battle_core::{CharacterId, Side};

/// Transient visual state of one actor's sprite.
///
/// `Hit` marks an actor striking, `Dmg` an actor being struck; both revert to
/// `Idle` shortly after, on the replay schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpriteMood {
    #[default]
    Idle,
    Hit,
    Dmg,
}

/// Named sound effects the surface may play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Hit,
    CriticalHit,
    Heal,
    Buff,
    Debuff,
    Miss,
    Victory,
    Defeat,
}

impl SoundCue {
    /// Asset name, matching the original sound files.
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Hit => "hit",
            SoundCue::CriticalHit => "critical_hit",
            SoundCue::Heal => "heal",
            SoundCue::Buff => "buff",
            SoundCue::Debuff => "debuff",
            SoundCue::Miss => "miss",
            SoundCue::Victory => "victory",
            SoundCue::Defeat => "defeat",
        }
    }
}

/// Screen position of an actor's visual, in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anchor {
    pub x: u16,
    pub y: u16,
}

/// Color family of a floating text effect; surfaces map tones to palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatTone {
    Damage,
    Heal,
    Buff,
    Debuff,
    Miss,
    Announcement,
}

/// One transient floating text, already resolved to a live anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloatingText {
    pub text: String,
    pub tone: FloatTone,
    pub critical: bool,
    pub anchor: Anchor,
}

/// Rendering/audio surface driven by the replay scheduler.
///
/// `anchor_of` may return `None` while an actor's visual is not mounted; the
/// caller skips the positional effect for that event and carries on.
pub trait StageDirector: Send + Sync {
    fn set_mood(&self, side: Side, id: CharacterId, mood: SpriteMood);

    fn anchor_of(&self, side: Side, id: CharacterId) -> Option<Anchor>;

    fn float_text(&self, float: FloatingText);

    fn play_sound(&self, cue: SoundCue);

    /// Full-surface overlay with a centered label (victory/defeat).
    fn show_banner(&self, text: &str);
}

/// Everything a [`RecordingStage`] saw, with its virtual-time offset.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEffect {
    Mood(Side, CharacterId, SpriteMood),
    Float(FloatingText),
    Sound(SoundCue),
    Banner(String),
}

/// Test double capturing every dispatched effect with its elapsed offset.
///
/// Anchors resolve to a fixed point for every actor, so positional effects
/// always dispatch; pair with `tokio::time::pause` for deterministic offsets.
pub struct RecordingStage {
    started: Instant,
    effects: Mutex<Vec<(Duration, RecordedEffect)>>,
}

impl RecordingStage {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            effects: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<(Duration, RecordedEffect)> {
        self.effects.lock().unwrap().clone()
    }

    fn push(&self, effect: RecordedEffect) {
        self.effects
            .lock()
            .unwrap()
            .push((self.started.elapsed(), effect));
    }
}

impl Default for RecordingStage {
    fn default() -> Self {
        Self::new()
    }
}

impl StageDirector for RecordingStage {
    fn set_mood(&self, side: Side, id: CharacterId, mood: SpriteMood) {
        self.push(RecordedEffect::Mood(side, id, mood));
    }

    fn anchor_of(&self, _side: Side, _id: CharacterId) -> Option<Anchor> {
        Some(Anchor { x: 10, y: 10 })
    }

    fn float_text(&self, float: FloatingText) {
        self.push(RecordedEffect::Float(float));
    }

    fn play_sound(&self, cue: SoundCue) {
        self.push(RecordedEffect::Sound(cue));
    }

    fn show_banner(&self, text: &str) {
        self.push(RecordedEffect::Banner(text.to_owned()));
    }
}
