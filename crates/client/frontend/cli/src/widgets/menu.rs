//! Selection menu: tells the player what the digit keys mean right now.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use battle_core::{Side, TargetClass, skill_by_id};
use client_frontend_core::{BattleViewModel, SelectionPhase, TurnComposer};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    composer: &TurnComposer,
    view_model: &BattleViewModel,
    turn_in_flight: bool,
) {
    let mut lines: Vec<Line> = Vec::new();

    if turn_in_flight {
        lines.push(Line::from(Span::styled(
            "Resolving turn...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    } else {
        match composer.phase() {
            SelectionPhase::ChoosingActor => {
                lines.push(Line::from("Choose a hero to act:"));
                for (index, _) in composer.heroes().iter().enumerate() {
                    let assigned = composer.pending_for(index as u8).is_some();
                    let name = view_model
                        .actor(Side::Hero, index as u8)
                        .map(|actor| actor.name.clone())
                        .unwrap_or_else(|| format!("Hero {}", index + 1));
                    let marker = if assigned { " [ready]" } else { "" };
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!(" {}. ", index + 1),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::raw(name),
                        Span::styled(marker, Style::default().fg(Color::Green)),
                    ]));
                }
            }
            SelectionPhase::ChoosingSkill => {
                lines.push(Line::from("Choose a skill:"));
                for (slot, skill_id) in composer.skills_of_selected().iter().enumerate() {
                    if let Some(skill) = skill_by_id(*skill_id) {
                        let target = match skill.target_class {
                            TargetClass::SelfOnly => "self",
                            TargetClass::Ally => "ally",
                            TargetClass::Enemy => "enemy",
                        };
                        lines.push(Line::from(vec![
                            Span::styled(
                                format!(" {}. ", slot + 1),
                                Style::default().fg(Color::Cyan),
                            ),
                            Span::styled(skill.name, Style::default().add_modifier(Modifier::BOLD)),
                            Span::styled(
                                format!("  ({target})"),
                                Style::default().fg(Color::DarkGray),
                            ),
                        ]));
                    }
                }
            }
            SelectionPhase::ChoosingTarget(side) => {
                let (label, color) = match side {
                    Side::Hero => ("Choose an ally target:", Color::Green),
                    Side::Monster => ("Choose an enemy target:", Color::Red),
                };
                lines.push(Line::from(Span::styled(
                    label,
                    Style::default().fg(color),
                )));
                for (index, actor) in view_model.side(side).iter().enumerate() {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!(" {}. ", index + 1),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::raw(actor.name.clone()),
                    ]));
                }
            }
        }
        lines.push(Line::from(Span::styled(
            "r reset turn   q quit",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Command"));
    frame.render_widget(paragraph, area);
}
