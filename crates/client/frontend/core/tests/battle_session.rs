//! End-to-end session cycles against the scripted in-memory ledger.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use battle_core::{BattleId, BattleOutcome, CharacterId, Side, SkillId};
use client_blockchain_core::mock::{MockLedger, demo_world, entries};
use client_frontend_core::{
    BattleSession, RecordingStage, ReplayTiming, SessionEvent,
};

fn session_over(
    ledger: MockLedger,
    stage: Arc<RecordingStage>,
) -> (BattleSession, mpsc::Receiver<SessionEvent>) {
    let (events_tx, events_rx) = mpsc::channel(16);
    let session = BattleSession::new(
        BattleId(1),
        Arc::new(ledger.clone()),
        Arc::new(ledger),
        stage,
        ReplayTiming::default(),
        events_tx,
    );
    (session, events_rx)
}

/// Drive the standard party through a complete three-action turn.
///
/// Angel (character 1) power-attacks monster 0, Mage (character 2) heals
/// Angel, Hero (character 3) debuffs monster 1. The last target selection
/// auto-submits.
fn compose_full_turn(session: &mut BattleSession) {
    assert!(session.select_actor(0));
    assert!(session.select_skill(SkillId(2)));
    assert!(session.select_target(Side::Monster, 0));

    assert!(session.select_actor(1));
    assert!(session.select_skill(SkillId(4)));
    assert!(session.select_target(Side::Hero, 0));

    assert!(session.select_actor(2));
    assert!(session.select_skill(SkillId(8)));
    assert!(session.select_target(Side::Monster, 1));
}

#[tokio::test(start_paused = true)]
async fn full_turn_cycle_replays_and_resyncs() {
    let mut world = demo_world(1);
    world.script_turn(vec![
        entries::damage(1, 0, 0, false, 30, false),
        entries::heal(1, 1, 0, 20, false),
        entries::debuff(1, 2, 1, 8, 10, false),
    ]);
    let ledger = MockLedger::new(world);
    let stage = Arc::new(RecordingStage::new());
    let (mut session, mut events_rx) = session_over(ledger, stage.clone());

    session.load().await.unwrap();
    assert_eq!(session.view_model().heroes.len(), 3);

    compose_full_turn(&mut session);
    assert!(session.is_turn_in_flight());

    // The guard blocks any further input until the cycle resolves.
    assert!(!session.select_actor(0));
    assert!(!session.force_submit());

    match events_rx.recv().await.unwrap() {
        SessionEvent::ReplayStarted { event_count } => assert_eq!(event_count, 3),
        other => panic!("expected ReplayStarted, got {other:?}"),
    }

    let started = Instant::now();
    match events_rx.recv().await.unwrap() {
        SessionEvent::TurnResolved { view_model } => {
            // Resync lands only after the full playback window.
            assert_eq!(started.elapsed(), Duration::from_millis(4500));
            // Monster 0 took 30: the resynchronized read reflects it.
            assert_eq!(view_model.monsters[0].current_hp, 50);
            session.apply_resync(view_model);
        }
        other => panic!("expected TurnResolved, got {other:?}"),
    }

    assert!(!session.is_turn_in_flight());
    assert!(!session.composer().is_complete());
    // Next turn opens normally.
    assert!(session.select_actor(0));

    // Playback dispatched something for each of the three events.
    assert!(!stage.recorded().is_empty());
}

#[tokio::test(start_paused = true)]
async fn terminal_turn_redirects_instead_of_resyncing() {
    let mut world = demo_world(1);
    world.script_turn(vec![entries::victory(1, "0xcafe")]);
    let ledger = MockLedger::new(world);
    let stage = Arc::new(RecordingStage::new());
    let (mut session, mut events_rx) = session_over(ledger, stage);

    session.load().await.unwrap();
    let started = Instant::now();
    compose_full_turn(&mut session);

    match events_rx.recv().await.unwrap() {
        SessionEvent::ReplayStarted { event_count } => assert_eq!(event_count, 1),
        other => panic!("expected ReplayStarted, got {other:?}"),
    }
    match events_rx.recv().await.unwrap() {
        SessionEvent::BattleOver { outcome } => {
            assert_eq!(outcome, BattleOutcome::Victory);
            // One event: 0 * 1000 + 1500 + 1000, plus the 2000 ms redirect.
            assert_eq!(started.elapsed(), Duration::from_millis(4500));
        }
        other => panic!("expected BattleOver, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn failed_submission_preserves_the_selection_for_retry() {
    let mut world = demo_world(1);
    world.fail_next_submission(client_blockchain_core::SubmitError::ConfirmationTimeout);
    let ledger = MockLedger::new(world);
    let stage = Arc::new(RecordingStage::new());
    let (mut session, mut events_rx) = session_over(ledger, stage.clone());

    session.load().await.unwrap();
    compose_full_turn(&mut session);

    match events_rx.recv().await.unwrap() {
        SessionEvent::SubmissionFailed { message } => {
            assert!(message.contains("timed out"), "unexpected message: {message}");
        }
        other => panic!("expected SubmissionFailed, got {other:?}"),
    }

    // Nothing played.
    assert!(stage.recorded().is_empty());

    // The player's choices survived; one keypress retries the same turn.
    session.acknowledge_failure();
    assert!(session.composer().is_complete());
    assert_eq!(
        session.composer().pending_for(0).unwrap().skill,
        SkillId(2)
    );
    assert!(session.force_submit());

    match events_rx.recv().await.unwrap() {
        SessionEvent::ReplayStarted { event_count } => assert_eq!(event_count, 0),
        other => panic!("expected ReplayStarted, got {other:?}"),
    }
    // Empty receipt degrades to an immediate resynchronization.
    assert!(matches!(
        events_rx.recv().await.unwrap(),
        SessionEvent::TurnResolved { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn teardown_mid_replay_silences_the_cycle() {
    let mut world = demo_world(1);
    world.script_turn(vec![
        entries::damage(1, 0, 0, false, 5, false),
        entries::damage(1, 1, 1, false, 5, false),
        entries::damage(1, 2, 2, false, 5, false),
        entries::damage(1, 0, 0, true, 5, false),
    ]);
    let ledger = MockLedger::new(world);
    let stage = Arc::new(RecordingStage::new());
    let (mut session, mut events_rx) = session_over(ledger, stage.clone());

    session.load().await.unwrap();
    compose_full_turn(&mut session);

    assert!(matches!(
        events_rx.recv().await.unwrap(),
        SessionEvent::ReplayStarted { event_count: 4 }
    ));

    // Screen navigated away halfway through playback.
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(1500)).await;
    tokio::task::yield_now().await;
    session.teardown();
    drop(session);

    // No resync, no redirect, no further events of any kind.
    assert!(events_rx.recv().await.is_none());

    let recorded = stage.recorded();
    assert!(!recorded.is_empty());
    assert!(
        recorded
            .iter()
            .all(|(at, _)| *at <= Duration::from_millis(1500)),
        "effect dispatched after teardown: {recorded:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn dead_heroes_are_excluded_from_the_next_turn() {
    let mut world = demo_world(1);
    // The monsters burst down Mage (90 hp) on the first exchange.
    world.script_turn(vec![entries::damage(1, 0, 1, true, 90, true)]);
    let ledger = MockLedger::new(world);
    let stage = Arc::new(RecordingStage::new());
    let (mut session, mut events_rx) = session_over(ledger, stage);

    session.load().await.unwrap();
    compose_full_turn(&mut session);

    assert!(matches!(
        events_rx.recv().await.unwrap(),
        SessionEvent::ReplayStarted { .. }
    ));
    match events_rx.recv().await.unwrap() {
        SessionEvent::TurnResolved { view_model } => session.apply_resync(view_model),
        other => panic!("expected TurnResolved, got {other:?}"),
    }

    // Two heroes left; the composer's roster shrank with the battle.
    assert_eq!(
        session.composer().heroes(),
        &[CharacterId(1), CharacterId(3)]
    );
    assert!(session.select_actor(1));
}
