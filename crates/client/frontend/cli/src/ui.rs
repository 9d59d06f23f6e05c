//! Battle screen layout and overlays.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use battle_core::Side;
use client_frontend_core::{
    BattleViewModel, FloatTone, FloatingText, MessageLog, SelectionPhase, TurnComposer,
};

use crate::stage::{StageSnapshot, TuiStage};
use crate::widgets;

/// Draw one frame of the battle screen.
#[allow(clippy::too_many_arguments)]
pub fn render(
    frame: &mut Frame,
    view_model: &BattleViewModel,
    composer: &TurnComposer,
    messages: &MessageLog,
    snapshot: &StageSnapshot,
    stage: &TuiStage,
    turn_in_flight: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(9),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], view_model, composer, turn_in_flight);

    let field = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    widgets::party::render(
        frame,
        field[0],
        Side::Hero,
        &view_model.heroes,
        composer,
        snapshot,
        stage,
    );
    widgets::party::render(
        frame,
        field[1],
        Side::Monster,
        &view_model.monsters,
        composer,
        snapshot,
        stage,
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    widgets::menu::render(frame, bottom[0], composer, view_model, turn_in_flight);
    widgets::log::render(frame, bottom[1], messages);

    // Transient overlays go last so they sit above everything else.
    // Announcements are carried by the centered banner, not a float.
    for float in &snapshot.floats {
        if float.tone != FloatTone::Announcement {
            render_float(frame, float);
        }
    }
    if let Some(text) = &snapshot.banner {
        render_banner(frame, text);
    }
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    view_model: &BattleViewModel,
    composer: &TurnComposer,
    turn_in_flight: bool,
) {
    let phase = if turn_in_flight {
        "replaying outcome".to_owned()
    } else {
        match composer.phase() {
            SelectionPhase::ChoosingActor => "select hero".to_owned(),
            SelectionPhase::ChoosingSkill => "select skill".to_owned(),
            SelectionPhase::ChoosingTarget(Side::Hero) => "select ally target".to_owned(),
            SelectionPhase::ChoosingTarget(Side::Monster) => "select enemy target".to_owned(),
        }
    };

    let line = Line::from(vec![
        Span::styled(
            "DESTINY",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  {}  level {}  ",
            view_model.battle_id, view_model.level
        )),
        Span::styled(format!("[{phase}]"), Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_float(frame: &mut Frame, float: &FloatingText) {
    let width = float.text.len() as u16;
    let frame_area = frame.area();
    let x = float
        .anchor
        .x
        .saturating_sub(width / 2)
        .min(frame_area.width.saturating_sub(width));
    let y = float.anchor.y.min(frame_area.height.saturating_sub(1));
    let area = Rect {
        x,
        y,
        width: width.min(frame_area.width),
        height: 1,
    };

    let mut style = Style::default().fg(tone_color(float.tone));
    if float.critical {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Span::styled(float.text.clone(), style)),
        area,
    );
}

fn render_banner(frame: &mut Frame, text: &str) {
    let frame_area = frame.area();
    let width = (text.len() as u16 + 8).min(frame_area.width);
    let area = Rect {
        x: frame_area.width.saturating_sub(width) / 2,
        y: frame_area.height / 2,
        width,
        height: 3,
    };

    let color = if text == "VICTORY" {
        Color::Green
    } else {
        Color::Red
    };
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Span::styled(
            text.to_owned(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .centered()
        .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn tone_color(tone: FloatTone) -> Color {
    match tone {
        FloatTone::Damage => Color::Red,
        FloatTone::Heal => Color::Green,
        FloatTone::Buff => Color::Cyan,
        FloatTone::Debuff => Color::Magenta,
        FloatTone::Miss => Color::Gray,
        FloatTone::Announcement => Color::Yellow,
    }
}
