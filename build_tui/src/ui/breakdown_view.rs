//! Calc tab - shows how each stat moves through the pipeline

use super::{format_value, section_header};
use crate::app::App;
use build_core::{Stage, StatKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(65),
            Constraint::Percentage(35),
        ])
        .split(area);

    draw_stage_table(f, app, chunks[0]);
    draw_formulas(f, chunks[1]);
}

fn draw_stage_table(f: &mut Frame, app: &App, area: Rect) {
    let breakdown = app.build.breakdown();
    let mut lines: Vec<Line> = Vec::new();

    let mut header = vec![Span::styled(format!("{:18}", "Stat"), Style::default().fg(Color::Gray))];
    for snapshot in &breakdown.stages {
        header.push(Span::styled(
            format!("{:>11}", snapshot.stage.name()),
            Style::default().fg(stage_color(snapshot.stage)).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(header));

    for stat in StatKind::all() {
        let mut row = vec![Span::styled(format!("{:18}", stat.label()), Style::default().fg(Color::Gray))];
        let mut previous: Option<f64> = None;
        for snapshot in &breakdown.stages {
            let value = snapshot.stats[*stat];
            let color = match previous {
                Some(p) if value > p => Color::Green,
                Some(p) if value < p => Color::Red,
                _ => Color::White,
            };
            row.push(Span::styled(format!("{:>11}", format_value(value)), Style::default().fg(color)));
            previous = Some(value);
        }
        lines.push(Line::from(row));
    }

    lines.push(Line::from(""));
    lines.push(section_header("Sources"));
    for snapshot in &breakdown.stages {
        let applied = if snapshot.sources.is_empty() {
            "-".to_string()
        } else {
            snapshot.sources.join(", ")
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:12}", snapshot.stage.name()),
                Style::default().fg(stage_color(snapshot.stage)),
            ),
            Span::styled(applied, Style::default().fg(Color::White)),
        ]));
    }

    if !breakdown.form_steps.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_header("Form Steps"));
        for step in &breakdown.form_steps {
            lines.push(Line::from(Span::styled(
                format!("{} ({})", step.form, step.tier.name()),
                Style::default().fg(Color::Magenta),
            )));
            for (stat, value) in step.stats.iter() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:16}", stat.label()), Style::default().fg(Color::Gray)),
                    Span::styled(format_value(*value), Style::default().fg(Color::White)),
                ]));
            }
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Stat Breakdown "),
        )
        .scroll((app.breakdown_scroll as u16, 0));

    f.render_widget(paragraph, area);
}

fn stage_color(stage: Stage) -> Color {
    match stage {
        Stage::Base => Color::Cyan,
        Stage::Manual => Color::Blue,
        Stage::Forms => Color::Magenta,
        Stage::Absorption | Stage::Possession => Color::LightRed,
        Stage::Modifiers => Color::Green,
    }
}

fn draw_formulas(f: &mut Frame, area: Rect) {
    let lines = vec![
        section_header("Pipeline"),
        Line::from(""),
        Line::from(Span::styled(
            "Base → Manual → Forms → Absorb → Possess → Mods",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Base   ", Style::default().fg(Color::Cyan)),
            Span::styled("= amount × ⌊level / every⌋", Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("  Manual ", Style::default().fg(Color::Blue)),
            Span::styled("= +points (total ≤ level)", Style::default().fg(Color::White)),
        ]),
        Line::from(""),
        section_header("Forms (in activation order)"),
        Line::from(""),
        Line::from(Span::styled("Flat:", Style::default().fg(Color::Yellow))),
        Line::from("  stat += ⌊bonus × mastery⌋"),
        Line::from(Span::styled("Multiplier:", Style::default().fg(Color::Yellow))),
        Line::from("  stat = ⌊stat × factor⌋"),
        Line::from("  Mastery never scales the factor"),
        Line::from(""),
        section_header("Race Mechanics"),
        Line::from(""),
        Line::from("  Absorb:  + clone or NPC stats"),
        Line::from("  Possess: + ⌊(body + extra) × 0.1⌋"),
        Line::from("           (HP and Ki excluded)"),
        Line::from(""),
        section_header("Modifiers"),
        Line::from(""),
        Line::from("  Flat:    stat += value"),
        Line::from("  Percent: stat = ⌊stat × (1 + p)⌋"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Formulas "));

    f.render_widget(paragraph, area);
}
