//! Build tab - race, level and manual point allocation

use super::{format_value, race_label, row_style, section_header, stat_line_with_computed};
use crate::app::{App, BuildRow};
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
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_selections(f, app, chunks[0]);
    draw_final_stats(f, app, chunks[1]);
}

fn draw_selections(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = vec![section_header("Character"), Line::from("")];

    for (i, row) in app.build_rows().iter().enumerate() {
        let selected = i == app.build_row;
        let (label, value) = match row {
            BuildRow::Race => ("Race".to_string(), app.selections.race().to_string()),
            BuildRow::Subrace => (
                "Subrace".to_string(),
                app.selections.subrace().unwrap_or("-").to_string(),
            ),
            BuildRow::Level => ("Level".to_string(), app.selections.level().to_string()),
            BuildRow::Stat(stat) => (
                stat.label().to_string(),
                format_value(app.selections.manual().get(*stat)),
            ),
        };

        if *row == BuildRow::Stat(build_core::StatKind::HpMax) {
            lines.push(Line::from(""));
            lines.push(section_header("Manual Points"));
        }

        let marker = if selected { "▶ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:20}", marker, label), row_style(selected)),
            Span::styled(format!(" {}", value), Style::default().fg(Color::Yellow)),
        ]));
    }

    lines.push(Line::from(""));
    let free = app.build.free_points();
    lines.push(Line::from(vec![
        Span::styled("  Free points        ", Style::default().fg(Color::Gray)),
        Span::styled(
            format_value(free),
            Style::default().fg(if free > 0.0 { Color::Green } else { Color::DarkGray }),
        ),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", race_label(app))),
    );
    f.render_widget(paragraph, area);
}

fn draw_final_stats(f: &mut Frame, app: &App, area: Rect) {
    let base = app.build.base_stats();
    let stats = app.final_stats();

    let mut lines = vec![section_header("Final Stats"), Line::from("")];
    for (stat, value) in stats.iter() {
        lines.push(stat_line_with_computed(stat.label(), base[stat], *value));
    }

    if !app.selections.forms().is_empty() {
        lines.push(Line::from(""));
        lines.push(section_header("Active Forms"));
        for active in app.selections.forms().iter() {
            lines.push(Line::from(Span::styled(
                format!("  {} ({})", active.form.name, active.tier.name()),
                Style::default().fg(Color::Magenta),
            )));
        }
    }

    let equipped: Vec<&str> = app
        .build
        .modifiers
        .iter()
        .flatten()
        .map(|m| m.name.as_str())
        .collect();
    if !equipped.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_header("Modifiers"));
        for name in equipped {
            lines.push(Line::from(Span::styled(
                format!("  {}", name),
                Style::default().fg(Color::Blue),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Stats "));
    f.render_widget(paragraph, area);
}
