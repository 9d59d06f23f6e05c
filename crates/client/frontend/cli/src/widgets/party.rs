//! One side's roster column: name, health gauge, and sprite per actor.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use battle_core::Side;
use client_frontend_core::{ActorView, Anchor, SelectionPhase, SpriteMood, TurnComposer};

use crate::stage::{StageSnapshot, TuiStage};

const ACTOR_HEIGHT: u16 = 5;

/// Render a roster column and register each sprite's anchor with the stage.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    side: Side,
    actors: &[ActorView],
    composer: &TurnComposer,
    snapshot: &StageSnapshot,
    stage: &TuiStage,
) {
    let title = match side {
        Side::Hero => "Heroes",
        Side::Monster => "Monsters",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let constraints: Vec<Constraint> = actors
        .iter()
        .map(|_| Constraint::Length(ACTOR_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (index, actor) in actors.iter().enumerate() {
        let row = rows[index];
        if row.height < ACTOR_HEIGHT {
            continue;
        }
        render_actor(frame, row, side, index as u8, actor, composer, snapshot);

        // The sprite's center is this actor's live visual anchor.
        stage.update_anchor(
            side,
            actor.id,
            Anchor {
                x: row.x + row.width / 2,
                y: row.y + 3,
            },
        );
    }
}

fn render_actor(
    frame: &mut Frame,
    area: Rect,
    side: Side,
    index: u8,
    actor: &ActorView,
    composer: &TurnComposer,
    snapshot: &StageSnapshot,
) {
    let mood = snapshot
        .moods
        .get(&(side, actor.id))
        .copied()
        .unwrap_or_default();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // name
            Constraint::Length(1), // gauge
            Constraint::Length(2), // sprite
            Constraint::Length(1), // spacer
        ])
        .split(area);

    let name_style = selection_style(side, index, actor, composer);
    let name = Line::from(vec![
        Span::styled(format!("{}. ", index + 1), Style::default().fg(Color::DarkGray)),
        Span::styled(actor.name.clone(), name_style),
        Span::styled(
            format!("  {}/{}", actor.current_hp, actor.max_hp),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(name), rows[0]);

    let gauge = Gauge::default()
        .ratio(actor.hp_ratio())
        .gauge_style(hp_style(actor))
        .label("");
    frame.render_widget(gauge, rows[1]);

    frame.render_widget(
        Paragraph::new(sprite_line(side, actor, mood)),
        rows[2],
    );
}

fn selection_style(side: Side, index: u8, actor: &ActorView, composer: &TurnComposer) -> Style {
    let base = if actor.current_hp == 0 {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };

    match composer.phase() {
        SelectionPhase::ChoosingActor if side == Side::Hero => {
            if composer.pending_for(index).is_some() {
                base.fg(Color::Green)
            } else {
                base.add_modifier(Modifier::BOLD)
            }
        }
        SelectionPhase::ChoosingSkill | SelectionPhase::ChoosingTarget(_)
            if side == Side::Hero && composer.selected_actor() == Some(index) =>
        {
            base.fg(Color::Yellow).add_modifier(Modifier::BOLD)
        }
        SelectionPhase::ChoosingTarget(target_side) if side == target_side => {
            base.fg(Color::Cyan).add_modifier(Modifier::BOLD)
        }
        _ => base,
    }
}

fn hp_style(actor: &ActorView) -> Style {
    let ratio = actor.hp_ratio();
    let color = if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    };
    Style::default().fg(color).bg(Color::Black)
}

fn sprite_line(side: Side, actor: &ActorView, mood: SpriteMood) -> Line<'static> {
    let glyph = if actor.current_hp == 0 {
        "  x_x  "
    } else {
        match side {
            Side::Hero => "  /o\\  ",
            Side::Monster => "  >Y<  ",
        }
    };
    let style = match mood {
        SpriteMood::Idle => Style::default().fg(Color::White),
        SpriteMood::Hit => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        SpriteMood::Dmg => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD | Modifier::RAPID_BLINK),
    };
    Line::from(Span::styled(glyph.to_owned(), style))
}
