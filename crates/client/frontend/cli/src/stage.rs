//! Terminal implementation of the stage capabilities.
//!
//! The replay driver calls in from its timer task; the render loop reads a
//! snapshot each frame. Everything lives behind one mutex, and all effects
//! are transient: floating texts expire on their lifetime, sound cues are
//! drained into the message log, sprite moods revert on the replay schedule.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::time::{Duration, Instant};

use battle_core::{CharacterId, Side};
use client_frontend_core::{Anchor, FloatingText, SoundCue, SpriteMood, StageDirector};

/// A floating text currently on screen.
#[derive(Clone, Debug)]
pub struct ActiveFloat {
    pub float: FloatingText,
    expires_at: Instant,
}

/// Frame-consistent copy of the stage for rendering.
#[derive(Clone, Debug, Default)]
pub struct StageSnapshot {
    pub moods: HashMap<(Side, CharacterId), SpriteMood>,
    pub floats: Vec<FloatingText>,
    pub banner: Option<String>,
}

#[derive(Default)]
struct StageState {
    moods: HashMap<(Side, CharacterId), SpriteMood>,
    floats: Vec<ActiveFloat>,
    banner: Option<String>,
    anchors: HashMap<(Side, CharacterId), Anchor>,
    pending_sounds: Vec<SoundCue>,
}

/// Shared stage surface between the replay task and the render loop.
pub struct TuiStage {
    float_lifetime: Duration,
    state: Mutex<StageState>,
}

impl TuiStage {
    pub fn new(float_lifetime: Duration) -> Self {
        Self {
            float_lifetime,
            state: Mutex::new(StageState::default()),
        }
    }

    /// Register where an actor's sprite was drawn this frame. The renderer
    /// calls this for every visible actor; replay effects for anyone not yet
    /// drawn simply skip their positional part.
    pub fn update_anchor(&self, side: Side, id: CharacterId, anchor: Anchor) {
        self.state.lock().unwrap().anchors.insert((side, id), anchor);
    }

    /// Drop expired floats and hand back what the frame should draw.
    pub fn frame_snapshot(&self) -> StageSnapshot {
        let mut state = self.state.lock().unwrap();
        let now = Instant::now();
        state.floats.retain(|float| float.expires_at > now);
        StageSnapshot {
            moods: state.moods.clone(),
            floats: state.floats.iter().map(|float| float.float.clone()).collect(),
            banner: state.banner.clone(),
        }
    }

    /// Sound cues dispatched since the last drain; the terminal has no audio
    /// device, so the app narrates them into the message log.
    pub fn drain_sounds(&self) -> Vec<SoundCue> {
        std::mem::take(&mut self.state.lock().unwrap().pending_sounds)
    }
}

impl StageDirector for TuiStage {
    fn set_mood(&self, side: Side, id: CharacterId, mood: SpriteMood) {
        let mut state = self.state.lock().unwrap();
        if mood == SpriteMood::Idle {
            state.moods.remove(&(side, id));
        } else {
            state.moods.insert((side, id), mood);
        }
    }

    fn anchor_of(&self, side: Side, id: CharacterId) -> Option<Anchor> {
        self.state.lock().unwrap().anchors.get(&(side, id)).copied()
    }

    fn float_text(&self, float: FloatingText) {
        let mut state = self.state.lock().unwrap();
        state.floats.push(ActiveFloat {
            float,
            expires_at: Instant::now() + self.float_lifetime,
        });
    }

    fn play_sound(&self, cue: SoundCue) {
        self.state.lock().unwrap().pending_sounds.push(cue);
    }

    fn show_banner(&self, text: &str) {
        self.state.lock().unwrap().banner = Some(text.to_owned());
    }
}
