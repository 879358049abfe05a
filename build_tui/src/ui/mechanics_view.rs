//! Mechanics tab - Majin absorption and Tuffle possession

use super::{format_value, row_style, section_header, stat_line};
use crate::app::{App, MechanicRow};
use build_core::{AbsorptionState, PossessionState, RaceMechanic};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    draw_controls(f, app, chunks[0]);
    draw_contribution(f, app, chunks[1]);
}

fn draw_controls(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    match app.mechanic() {
        Some(RaceMechanic::Absorption) => lines.push(section_header("Absorption")),
        Some(RaceMechanic::Possession) => lines.push(section_header("Possession")),
        None => {
            lines.push(Line::from(Span::styled(
                format!("{} has no race mechanic", app.selections.race()),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines.push(Line::from(""));

    for (i, row) in app.mechanic_rows().iter().enumerate() {
        let selected = i == app.mechanic_row;
        let marker = if selected { "▶ " } else { "  " };
        let (label, value) = describe(app, *row);
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:20}", marker, label), row_style(selected)),
            Span::styled(format!(" {}", value), Style::default().fg(Color::Yellow)),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Race Mechanic "));
    f.render_widget(paragraph, area);
}

fn describe(app: &App, row: MechanicRow) -> (String, String) {
    let absorption = &app.selections.absorption;
    let possession = app.selections.possession();

    match row {
        MechanicRow::AbsorbMode => {
            let mode = match absorption {
                AbsorptionState::None => "None",
                AbsorptionState::ClonedLevel { .. } => "Clone self",
                AbsorptionState::NpcPreset { .. } => "NPC",
            };
            ("Mode".to_string(), mode.to_string())
        }
        MechanicRow::AbsorbLevel => {
            let level = match absorption {
                AbsorptionState::ClonedLevel { level } => level.to_string(),
                _ => "-".to_string(),
            };
            ("Clone level".to_string(), level)
        }
        MechanicRow::AbsorbNpc => {
            let name = match absorption {
                AbsorptionState::NpcPreset { name } => name.clone(),
                _ => "-".to_string(),
            };
            ("NPC".to_string(), name)
        }
        MechanicRow::PossessTarget => {
            let target = match possession {
                PossessionState::Target { race, .. } => race.clone(),
                PossessionState::None => "None".to_string(),
            };
            ("Target race".to_string(), target)
        }
        MechanicRow::PossessSubrace => {
            let sub = match possession {
                PossessionState::Target { subrace, .. } => subrace.clone().unwrap_or_else(|| "default".to_string()),
                PossessionState::None => "-".to_string(),
            };
            ("Target subrace".to_string(), sub)
        }
        MechanicRow::PossessLevel => {
            let level = match possession {
                PossessionState::Target { level: Some(l), .. } => l.to_string(),
                _ => format!("own ({})", app.selections.level()),
            };
            ("Body level".to_string(), level)
        }
        MechanicRow::PossessExtra(stat) => {
            let points = match possession {
                PossessionState::Target { extra, .. } => format_value(extra[stat]),
                PossessionState::None => "-".to_string(),
            };
            (format!("Body {}", stat.label()), points)
        }
    }
}

fn draw_contribution(f: &mut Frame, app: &App, area: Rect) {
    let (title, stats) = match app.mechanic() {
        Some(RaceMechanic::Absorption) => ("Absorbed Stats", app.build.absorption_stats),
        Some(RaceMechanic::Possession) => ("Possession Bonus", app.build.possession_stats),
        None => ("Contribution", build_core::StatBlock::zero()),
    };

    let mut lines = vec![section_header(title), Line::from("")];
    for (stat, value) in stats.iter() {
        lines.push(stat_line(stat.label(), *value));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Contribution "));
    f.render_widget(paragraph, area);
}
