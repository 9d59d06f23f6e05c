//! Glue code tying the battle session, stage, and terminal UI together.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::{
    sync::mpsc,
    time::{self, Duration},
};

use battle_core::{BattleOutcome, SkillId};
use client_bootstrap::SessionSetup;
use client_frontend_core::{
    BattleSession, MessageLog, SelectionPhase, SessionEvent,
};

use crate::stage::TuiStage;
use crate::terminal::{self, TerminalGuard, Tui};
use crate::ui;

const FRAME_INTERVAL_MS: u64 = 16;

/// Terminal battle client application.
pub struct CliApp {
    session: BattleSession,
    events_rx: mpsc::Receiver<SessionEvent>,
    stage: Arc<TuiStage>,
    messages: MessageLog,
    outcome: Option<BattleOutcome>,
    should_quit: bool,
}

impl CliApp {
    pub fn new(setup: SessionSetup, stage: Arc<TuiStage>) -> Self {
        let SessionSetup {
            config,
            session,
            events_rx,
        } = setup;

        let mut messages = MessageLog::new(config.message_capacity);
        messages.push_info(format!(
            "Entering {} (level {}).",
            session.battle_id(),
            session.view_model().level
        ));
        messages.push_info("Assign an action to every hero to play the turn.");

        Self {
            session,
            events_rx,
            stage,
            messages,
            outcome: None,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut terminal = terminal::init()?;
        let _guard = TerminalGuard;

        let result = self.event_loop(&mut terminal).await;
        self.session.teardown();
        result
    }

    async fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        self.render(terminal)?;

        loop {
            tokio::select! {
                maybe_event = self.events_rx.recv() => {
                    if let Some(session_event) = maybe_event {
                        self.handle_session_event(session_event);
                    }
                }
                _ = time::sleep(Duration::from_millis(FRAME_INTERVAL_MS)) => {
                    self.handle_input()?;
                }
            }

            self.narrate_sounds();
            self.render(terminal)?;

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn handle_session_event(&mut self, session_event: SessionEvent) {
        match session_event {
            SessionEvent::SubmissionFailed { message } => {
                self.messages
                    .push_error(format!("Submission failed: {message}. Press p to retry."));
                self.session.acknowledge_failure();
            }
            SessionEvent::ReplayStarted { event_count } => {
                self.messages
                    .push_info(format!("Turn confirmed: {event_count} outcomes incoming."));
            }
            SessionEvent::TurnResolved { view_model } => {
                self.session.apply_resync(view_model);
                self.messages
                    .push_info("Round resolved. Choose your next actions.");
            }
            SessionEvent::ResyncFailed { message } => {
                tracing::warn!(target: "cli", %message, "resync failed");
                self.session.acknowledge_stale_resync();
                self.messages
                    .push_error("State refresh failed; showing last known values.");
            }
            SessionEvent::BattleOver { outcome } => {
                self.session.mark_finished();
                self.outcome = Some(outcome);
                let line = match outcome {
                    BattleOutcome::Victory => "Victory! Press q to leave the battlefield.",
                    BattleOutcome::Defeat => "Defeat... Press q to leave the battlefield.",
                };
                self.messages.push_combat(line);
            }
        }
    }

    fn handle_input(&mut self) -> Result<()> {
        while event::poll(std::time::Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                _ if self.outcome.is_some() => {}
                KeyCode::Char('r') => {
                    self.session.reset_turn();
                    self.messages.push_info("Turn selection cleared.");
                }
                KeyCode::Char('p') => {
                    if self.session.force_submit() {
                        self.messages.push_info("Submitting turn...");
                    }
                }
                KeyCode::Char(digit @ '1'..='9') => {
                    self.handle_digit(digit as u8 - b'1');
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Digit keys are contextual: hero, skill slot, or target, depending on
    /// where the selection machine stands.
    fn handle_digit(&mut self, index: u8) {
        match self.session.composer().phase() {
            SelectionPhase::ChoosingActor => {
                self.session.select_actor(index);
            }
            SelectionPhase::ChoosingSkill => {
                let chosen: Option<SkillId> = self
                    .session
                    .composer()
                    .skills_of_selected()
                    .get(usize::from(index))
                    .copied();
                if let Some(skill) = chosen {
                    self.session.select_skill(skill);
                }
            }
            SelectionPhase::ChoosingTarget(side) => {
                if self.session.select_target(side, index) && self.session.is_turn_in_flight() {
                    self.messages
                        .push_info("All actions locked in. Submitting turn...");
                }
            }
        }
    }

    fn narrate_sounds(&mut self) {
        for cue in self.stage.drain_sounds() {
            self.messages.push_combat(format!("\u{266a} {}", cue.name()));
        }
    }

    fn render(&mut self, terminal: &mut Tui) -> Result<()> {
        let snapshot = self.stage.frame_snapshot();
        terminal.draw(|frame| {
            ui::render(
                frame,
                self.session.view_model(),
                self.session.composer(),
                &self.messages,
                &snapshot,
                &self.stage,
                self.session.is_turn_in_flight(),
            );
        })?;
        Ok(())
    }
}
