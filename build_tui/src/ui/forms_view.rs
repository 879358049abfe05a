//! Forms tab - toggle transformations and preview their bonuses

use super::{format_value, row_style, scroll_to, section_header};
use crate::app::App;
use build_core::source::form_bonus;
use build_core::{BonusType, MasteryTier};
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
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_form_list(f, app, chunks[0]);
    draw_form_detail(f, app, chunks[1]);
}

fn draw_form_list(f: &mut Frame, app: &App, area: Rect) {
    let forms = app.available_forms();
    let mut lines: Vec<Line> = Vec::new();

    if forms.is_empty() {
        lines.push(Line::from(Span::styled(
            "No forms available",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (i, (_, form)) in forms.iter().enumerate() {
        let selected = i == app.selected_form;
        let active = app.selections.forms().tier_of(&form.name);
        let marker = if active.is_some() { "[x]" } else { "[ ]" };
        let kind = if form.stackable { " stack" } else { "" };

        let mut spans = vec![Span::styled(format!("{} {}", marker, form.name), row_style(selected))];
        if let Some(tier) = active {
            spans.push(Span::styled(
                format!(" {}", tier.name()),
                Style::default().fg(Color::Magenta),
            ));
        }
        spans.push(Span::styled(kind, Style::default().fg(Color::DarkGray)));
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Forms - {} ", app.selections.race())),
        )
        .scroll((scroll_to(app.selected_form, area.height), 0));
    f.render_widget(paragraph, area);
}

fn draw_form_detail(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(section_header("Mastery"));
    let tiers: Vec<Span> = MasteryTier::all()
        .iter()
        .map(|t| {
            let style = if *t == app.form_tier {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!(" {} ", t.name()), style)
        })
        .collect();
    lines.push(Line::from(tiers));
    lines.push(Line::from(""));

    if let Some((_, form)) = app.available_forms().get(app.selected_form) {
        lines.push(section_header(&form.name));
        for (stat, value) in form_bonus(form, app.form_tier) {
            let text = match form.effective_bonus_type(stat) {
                BonusType::Multiplier if !form.ignore_mastery.contains(&stat) => {
                    format!("x{}", format_value(value))
                }
                BonusType::Multiplier => format!("x{} (fixed)", format_value(value)),
                BonusType::Flat if form.ignore_mastery.contains(&stat) => {
                    format!("{:+} (fixed)", value)
                }
                BonusType::Flat => format!("{:+}", value),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:20}", stat.label()), Style::default().fg(Color::Gray)),
                Span::styled(text, Style::default().fg(Color::Green)),
            ]));
        }
        if let Some(sub) = &form.subrace {
            lines.push(Line::from(Span::styled(
                format!("  {} only", sub),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(section_header("Applied Order"));
    if app.selections.forms().is_empty() {
        lines.push(Line::from(Span::styled("  (none)", Style::default().fg(Color::DarkGray))));
    }
    let breakdown = app.build.breakdown();
    for (i, step) in breakdown.form_steps.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}. {} ({})", i + 1, step.form, step.tier.name()),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(
                format!("  melee {} / ki {}", format_value(step.stats.melee_damage), format_value(step.stats.ki_damage)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Form Detail "));
    f.render_widget(paragraph, area);
}
