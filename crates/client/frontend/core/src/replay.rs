//! Combat event replay: timed playback of the ledger's outcome log.
//!
//! The plan is pure data: every event at ordinal `i` dispatches its effects
//! at `i * cadence`, mood transients revert on their own shorter timer, and
//! the whole schedule is flattened into one time-sorted list. The driver then
//! plays that list on the runtime clock, checking a generation counter before
//! every dispatch so a cancelled or superseded replay can never leak effects
//! onto an unrelated screen.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::{Duration, Instant};

use battle_core::{BattleOutcome, CharacterId, CombatEvent, RosterSnapshot, Side, terminal_outcome};

use crate::stage::{Anchor, FloatTone, FloatingText, SoundCue, SpriteMood, StageDirector};

/// Fixed delays of the playback pipeline. All overridable via configuration.
#[derive(Clone, Copy, Debug)]
pub struct ReplayTiming {
    /// Per-event playback cadence.
    pub cadence: Duration,
    /// How long a hit/dmg sprite state lasts before reverting to idle.
    pub mood_revert: Duration,
    /// Lifetime of a floating text effect.
    pub float_lifetime: Duration,
    /// Absorbs ledger state propagation lag before resynchronizing.
    pub sync_buffer: Duration,
    /// Extra pause before leaving the battle screen after a terminal event.
    pub redirect_delay: Duration,
}

impl Default for ReplayTiming {
    fn default() -> Self {
        Self {
            cadence: Duration::from_millis(1000),
            mood_revert: Duration::from_millis(600),
            float_lifetime: Duration::from_millis(1500),
            sync_buffer: Duration::from_millis(1000),
            redirect_delay: Duration::from_millis(2000),
        }
    }
}

/// One scheduled side effect. Character references are already resolved to
/// stable ids against the submission-time roster snapshot; anchors stay
/// unresolved until dispatch so they bind to the live surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Mood {
        side: Side,
        id: CharacterId,
        mood: SpriteMood,
    },
    Float {
        side: Side,
        id: CharacterId,
        text: String,
        tone: FloatTone,
        critical: bool,
    },
    Sound(SoundCue),
    Banner(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimedEffect {
    pub at: Duration,
    pub effect: Effect,
}

/// Flattened, time-sorted playback schedule for one receipt.
#[derive(Clone, Debug, Default)]
pub struct ReplayPlan {
    pub schedule: Vec<TimedEffect>,
    pub total_duration: Duration,
    pub terminal: Option<BattleOutcome>,
}

impl ReplayPlan {
    /// Build the schedule for a decoded event list.
    ///
    /// Indices that fall outside the snapshot resolve to nothing and their
    /// effects are simply not scheduled; the replay never fails over them.
    /// Terminal outcome is decided here, by pre-scan, not during playback.
    pub fn build(events: &[CombatEvent], roster: &RosterSnapshot, timing: &ReplayTiming) -> Self {
        let mut schedule = Vec::new();

        for (ordinal, event) in events.iter().enumerate() {
            let at = timing.cadence * ordinal as u32;
            let revert_at = at + timing.mood_revert;
            let source = event
                .source()
                .and_then(|(side, index)| roster.resolve(index, side).map(|id| (side, id)));
            let target = event
                .target()
                .and_then(|(side, index)| roster.resolve(index, side).map(|id| (side, id)));

            match event {
                CombatEvent::Damage {
                    damage,
                    critical_hit,
                    ..
                } => {
                    if let Some((side, id)) = source {
                        push_mood(&mut schedule, at, revert_at, side, id, SpriteMood::Hit);
                    }
                    if let Some((side, id)) = target {
                        push_mood(&mut schedule, at, revert_at, side, id, SpriteMood::Dmg);
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Float {
                                side,
                                id,
                                text: format!("-{damage}"),
                                tone: FloatTone::Damage,
                                critical: *critical_hit,
                            },
                        });
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Sound(if *critical_hit {
                                SoundCue::CriticalHit
                            } else {
                                SoundCue::Hit
                            }),
                        });
                    }
                }
                CombatEvent::Heal { amount, .. } => {
                    if let Some((side, id)) = source {
                        push_mood(&mut schedule, at, revert_at, side, id, SpriteMood::Hit);
                    }
                    if let Some((side, id)) = target {
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Float {
                                side,
                                id,
                                text: format!("+{amount}"),
                                tone: FloatTone::Heal,
                                critical: false,
                            },
                        });
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Sound(SoundCue::Heal),
                        });
                    }
                }
                CombatEvent::Buff { amount, .. } => {
                    if let Some((side, id)) = source {
                        push_mood(&mut schedule, at, revert_at, side, id, SpriteMood::Hit);
                    }
                    if let Some((side, id)) = target {
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Float {
                                side,
                                id,
                                text: format!("+{amount}"),
                                tone: FloatTone::Buff,
                                critical: false,
                            },
                        });
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Sound(SoundCue::Buff),
                        });
                    }
                }
                CombatEvent::Debuff { amount, .. } => {
                    if let Some((side, id)) = source {
                        push_mood(&mut schedule, at, revert_at, side, id, SpriteMood::Hit);
                    }
                    if let Some((side, id)) = target {
                        push_mood(&mut schedule, at, revert_at, side, id, SpriteMood::Dmg);
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Float {
                                side,
                                id,
                                text: format!("-{amount}"),
                                tone: FloatTone::Debuff,
                                critical: false,
                            },
                        });
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Sound(SoundCue::Debuff),
                        });
                    }
                }
                CombatEvent::Miss { .. } => {
                    if let Some((side, id)) = source {
                        push_mood(&mut schedule, at, revert_at, side, id, SpriteMood::Hit);
                    }
                    if let Some((side, id)) = target {
                        push_mood(&mut schedule, at, revert_at, side, id, SpriteMood::Hit);
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Float {
                                side,
                                id,
                                text: "MISS".to_owned(),
                                tone: FloatTone::Miss,
                                critical: false,
                            },
                        });
                        schedule.push(TimedEffect {
                            at,
                            effect: Effect::Sound(SoundCue::Miss),
                        });
                    }
                }
                CombatEvent::Victory { .. } => {
                    schedule.push(TimedEffect {
                        at,
                        effect: Effect::Banner("VICTORY".to_owned()),
                    });
                    schedule.push(TimedEffect {
                        at,
                        effect: Effect::Sound(SoundCue::Victory),
                    });
                }
                CombatEvent::Defeat { .. } => {
                    schedule.push(TimedEffect {
                        at,
                        effect: Effect::Banner("DEFEAT".to_owned()),
                    });
                    schedule.push(TimedEffect {
                        at,
                        effect: Effect::Sound(SoundCue::Defeat),
                    });
                }
            }
        }

        // Stable sort keeps same-offset effects in event order.
        schedule.sort_by_key(|timed| timed.at);

        let total_duration = if events.is_empty() {
            Duration::ZERO
        } else {
            timing.cadence * (events.len() as u32 - 1)
                + timing.float_lifetime
                + timing.sync_buffer
        };

        Self {
            schedule,
            total_duration,
            terminal: terminal_outcome(events),
        }
    }
}

/// Schedule a transient sprite state and its automatic revert to idle.
fn push_mood(
    schedule: &mut Vec<TimedEffect>,
    at: Duration,
    revert_at: Duration,
    side: Side,
    id: CharacterId,
    mood: SpriteMood,
) {
    schedule.push(TimedEffect {
        at,
        effect: Effect::Mood { side, id, mood },
    });
    schedule.push(TimedEffect {
        at: revert_at,
        effect: Effect::Mood {
            side,
            id,
            mood: SpriteMood::Idle,
        },
    });
}

/// How one playback run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayCompletion {
    /// Every effect fired and the full duration elapsed.
    Finished(Option<BattleOutcome>),
    /// Superseded or torn down; remaining effects were dropped.
    Cancelled,
}

/// Cancellable player for [`ReplayPlan`]s.
///
/// Each run captures the generation counter at start; `cancel` bumps it, and
/// any timer callback from a stale generation becomes a no-op. This replaces
/// ad hoc "has this fired" flags with a structural guarantee.
#[derive(Clone)]
pub struct ReplayDriver {
    stage: Arc<dyn StageDirector>,
    epoch: Arc<AtomicU64>,
}

impl ReplayDriver {
    pub fn new(stage: Arc<dyn StageDirector>) -> Self {
        Self {
            stage,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Invalidate any in-flight run. Idempotent; safe from any task.
    pub fn cancel(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Play a plan to completion on the runtime clock.
    ///
    /// Returns [`ReplayCompletion::Cancelled`] as soon as a stale generation
    /// is observed; no further effects are dispatched from that run.
    pub async fn run(&self, plan: ReplayPlan) -> ReplayCompletion {
        let generation = self.epoch.load(Ordering::SeqCst);
        let started = Instant::now();

        for timed in &plan.schedule {
            tokio::time::sleep_until(started + timed.at).await;
            if self.epoch.load(Ordering::SeqCst) != generation {
                tracing::debug!(
                    target: "frontend::replay",
                    "replay superseded, dropping remaining effects"
                );
                return ReplayCompletion::Cancelled;
            }
            self.dispatch(&timed.effect);
        }

        tokio::time::sleep_until(started + plan.total_duration).await;
        if self.epoch.load(Ordering::SeqCst) != generation {
            return ReplayCompletion::Cancelled;
        }
        ReplayCompletion::Finished(plan.terminal)
    }

    fn dispatch(&self, effect: &Effect) {
        match effect {
            Effect::Mood { side, id, mood } => self.stage.set_mood(*side, *id, *mood),
            Effect::Float {
                side,
                id,
                text,
                tone,
                critical,
            } => match self.stage.anchor_of(*side, *id) {
                Some(anchor) => self.stage.float_text(FloatingText {
                    text: text.clone(),
                    tone: *tone,
                    critical: *critical,
                    anchor,
                }),
                // Visual not mounted: skip the positional effect, keep going.
                None => tracing::debug!(
                    target: "frontend::replay",
                    ?side,
                    %id,
                    "no anchor for floating text, skipping"
                ),
            },
            Effect::Sound(cue) => self.stage.play_sound(*cue),
            Effect::Banner(text) => {
                self.stage.show_banner(text);
                // Announcements are centered by the surface; the anchor is a
                // placeholder.
                self.stage.float_text(FloatingText {
                    text: text.clone(),
                    tone: FloatTone::Announcement,
                    critical: false,
                    anchor: Anchor::default(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{RecordedEffect, RecordingStage};

    use battle_core::{BattleId, PlayerAddress};

    fn roster() -> RosterSnapshot {
        RosterSnapshot::new(
            vec![CharacterId(1), CharacterId(2), CharacterId(3)],
            vec![CharacterId(4), CharacterId(5)],
        )
    }

    fn damage(from_idx: u8, to_idx: u8) -> CombatEvent {
        CombatEvent::Damage {
            battle_id: BattleId(1),
            from_idx,
            to_idx,
            damage: 10,
            critical_hit: false,
            is_monster: false,
        }
    }

    fn heal(from_idx: u8, to_idx: u8) -> CombatEvent {
        CombatEvent::Heal {
            battle_id: BattleId(1),
            from_idx,
            to_idx,
            amount: 5,
            is_monster: false,
        }
    }

    fn victory() -> CombatEvent {
        CombatEvent::Victory {
            battle_id: BattleId(1),
            player: PlayerAddress("0xcafe".into()),
        }
    }

    #[test]
    fn plan_spaces_events_by_cadence() {
        let timing = ReplayTiming::default();
        let events = vec![damage(0, 0), heal(1, 1), victory()];
        let plan = ReplayPlan::build(&events, &roster(), &timing);

        assert_eq!(plan.terminal, Some(BattleOutcome::Victory));
        // (3 - 1) * 1000 + 1500 + 1000.
        assert_eq!(plan.total_duration, Duration::from_millis(4500));

        // Damage at 0 ms, heal at 1000 ms, banner at 2000 ms.
        let offset_of = |needle: fn(&Effect) -> bool| {
            plan.schedule
                .iter()
                .find(|timed| needle(&timed.effect))
                .map(|timed| timed.at)
        };
        assert_eq!(
            offset_of(|e| matches!(e, Effect::Float { tone: FloatTone::Damage, .. })),
            Some(Duration::ZERO)
        );
        assert_eq!(
            offset_of(|e| matches!(e, Effect::Float { tone: FloatTone::Heal, .. })),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(
            offset_of(|e| matches!(e, Effect::Banner(_))),
            Some(Duration::from_millis(2000))
        );

        // Damage source mood reverts to idle on the shorter timer.
        let revert = plan
            .schedule
            .iter()
            .find(|timed| {
                matches!(
                    timed.effect,
                    Effect::Mood {
                        id: CharacterId(1),
                        mood: SpriteMood::Idle,
                        ..
                    }
                )
            })
            .unwrap();
        assert_eq!(revert.at, Duration::from_millis(600));
    }

    #[test]
    fn plan_skips_unresolvable_indices() {
        let timing = ReplayTiming::default();
        // Target index 7 does not exist on the monster side.
        let events = vec![damage(0, 7)];
        let plan = ReplayPlan::build(&events, &roster(), &timing);

        assert!(plan
            .schedule
            .iter()
            .all(|timed| !matches!(timed.effect, Effect::Float { .. })));
        // Source mood still plays.
        assert!(plan
            .schedule
            .iter()
            .any(|timed| matches!(timed.effect, Effect::Mood { mood: SpriteMood::Hit, .. })));
    }

    #[test]
    fn empty_plan_has_zero_duration() {
        let plan = ReplayPlan::build(&[], &roster(), &ReplayTiming::default());
        assert!(plan.schedule.is_empty());
        assert_eq!(plan.total_duration, Duration::ZERO);
        assert_eq!(plan.terminal, None);
    }

    #[tokio::test(start_paused = true)]
    async fn run_finishes_after_exact_total_duration() {
        let stage = Arc::new(RecordingStage::new());
        let driver = ReplayDriver::new(stage.clone());
        let timing = ReplayTiming::default();
        let events = vec![damage(0, 0), heal(1, 1), damage(1, 1)];
        let plan = ReplayPlan::build(&events, &roster(), &timing);

        let started = Instant::now();
        let completion = driver.run(plan).await;

        assert_eq!(completion, ReplayCompletion::Finished(None));
        // Resynchronization becomes due at exactly (E-1)*1000 + 1500 + 1000.
        assert_eq!(started.elapsed(), Duration::from_millis(4500));

        let sounds: Vec<Duration> = stage
            .recorded()
            .into_iter()
            .filter(|(_, effect)| matches!(effect, RecordedEffect::Sound(_)))
            .map(|(at, _)| at)
            .collect();
        assert_eq!(
            sounds,
            vec![
                Duration::ZERO,
                Duration::from_millis(1000),
                Duration::from_millis(2000)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_drops_everything_after_the_cut() {
        let stage = Arc::new(RecordingStage::new());
        let driver = ReplayDriver::new(stage.clone());
        let timing = ReplayTiming::default();
        // Four events; teardown strikes at (E-1)*500 = 1500 ms.
        let events = vec![damage(0, 0), damage(0, 1), damage(1, 0), damage(1, 1)];
        let plan = ReplayPlan::build(&events, &roster(), &timing);

        let runner = {
            let driver = driver.clone();
            tokio::spawn(async move { driver.run(plan).await })
        };

        // Let playback reach 1500 ms, then tear down.
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(1500)).await;
        tokio::task::yield_now().await;
        driver.cancel();

        let completion = runner.await.unwrap();
        assert_eq!(completion, ReplayCompletion::Cancelled);

        let recorded = stage.recorded();
        assert!(!recorded.is_empty());
        assert!(
            recorded
                .iter()
                .all(|(at, _)| *at <= Duration::from_millis(1500)),
            "an effect leaked past the teardown point: {recorded:?}"
        );
        // Events at ordinals 2 and 3 (2000 ms, 3000 ms) never dispatched.
        let damage_floats = recorded
            .iter()
            .filter(|(_, effect)| matches!(effect, RecordedEffect::Float(_)))
            .count();
        assert_eq!(damage_floats, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_plan_resolves_immediately() {
        let stage = Arc::new(RecordingStage::new());
        let driver = ReplayDriver::new(stage.clone());

        let started = Instant::now();
        let completion = driver.run(ReplayPlan::default()).await;
        assert_eq!(completion, ReplayCompletion::Finished(None));
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(stage.recorded().is_empty());
    }
}
