//! Loadout tab - modifier and move slots

use super::{row_style, scroll_to, section_header};
use crate::app::{App, LoadoutFocus, LoadoutSlot};
use build_core::types::MODIFIER_SLOTS;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_slots(f, app, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(chunks[1]);

    draw_choices(f, app, right[0]);
    draw_description(f, app, right[1]);
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_slots(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = vec![section_header("Modifiers")];

    for (slot, index) in app.selections.modifiers.slots().iter().enumerate() {
        let name = index
            .and_then(|i| app.catalog.modifier(i))
            .map(|m| m.name.as_str())
            .unwrap_or("(empty)");
        lines.push(slot_line(app, slot, name));
    }

    lines.push(Line::from(""));
    lines.push(section_header("Moves"));
    for (slot, index) in app.selections.moves.slots().iter().enumerate() {
        let name = index
            .and_then(|i| app.catalog.move_at(i))
            .map(|m| m.name.as_str())
            .unwrap_or("(empty)");
        lines.push(slot_line(app, MODIFIER_SLOTS + slot, name));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_border(app.loadout_focus == LoadoutFocus::Slots))
            .title(" Slots "),
    );
    f.render_widget(paragraph, area);
}

fn slot_line(app: &App, row: usize, name: &str) -> Line<'static> {
    let selected = row == app.selected_slot;
    let label = if row < MODIFIER_SLOTS {
        format!("Mod {}", row + 1)
    } else {
        format!("Move {}", row - MODIFIER_SLOTS + 1)
    };
    let name_style = if name == "(empty)" {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Line::from(vec![
        Span::styled(format!("{:8}", label), row_style(selected)),
        Span::styled(format!(" {}", name), name_style),
    ])
}

fn draw_choices(f: &mut Frame, app: &App, area: Rect) {
    let choices = app.slot_choices();
    let focused = app.loadout_focus == LoadoutFocus::Catalog;

    let lines: Vec<Line> = choices
        .iter()
        .enumerate()
        .map(|(i, (index, name))| {
            let selected = focused && i == app.selected_entry;
            let category = match app.current_slot() {
                LoadoutSlot::Modifier(_) => app.catalog.modifier(*index).map(|m| m.category.name()),
                LoadoutSlot::Move(_) => app.catalog.move_at(*index).map(|m| m.category.name()),
            };
            Line::from(vec![
                Span::styled(format!("{:28}", name), row_style(selected)),
                Span::styled(
                    format!(" {}", category.unwrap_or_default()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let title = match app.current_slot() {
        LoadoutSlot::Modifier(_) => format!(" Modifiers ({}) ", choices.len()),
        LoadoutSlot::Move(_) => format!(" Moves for {} ({}) ", app.selections.race(), choices.len()),
    };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(focused))
                .title(title),
        )
        .scroll((scroll_to(app.selected_entry, area.height), 0));
    f.render_widget(paragraph, area);
}

fn draw_description(f: &mut Frame, app: &App, area: Rect) {
    let index = app.slot_choices().get(app.selected_entry).map(|(i, _)| *i);
    let mut lines: Vec<Line> = Vec::new();

    match (app.current_slot(), index) {
        (LoadoutSlot::Modifier(_), Some(i)) => {
            if let Some(modifier) = app.catalog.modifier(i) {
                lines.push(Line::from(Span::styled(
                    modifier.name.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                let effects: Vec<String> = modifier
                    .effective_bonuses()
                    .map(|(stat, bonus)| {
                        if bonus.percentage {
                            format!("{} {:+}%", stat.label(), bonus.value * 100.0)
                        } else {
                            format!("{} {:+}", stat.label(), bonus.value)
                        }
                    })
                    .collect();
                if effects.is_empty() {
                    lines.push(Line::from(Span::styled("No stat effect", Style::default().fg(Color::DarkGray))));
                } else {
                    lines.push(Line::from(Span::styled(effects.join(", "), Style::default().fg(Color::Green))));
                }
                if !modifier.description.is_empty() {
                    lines.push(Line::from(modifier.description.clone()));
                }
            }
        }
        (LoadoutSlot::Move(_), Some(i)) => {
            if let Some(mv) = app.catalog.move_at(i) {
                lines.push(Line::from(Span::styled(
                    mv.name.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                let who = match &mv.allowed_races {
                    Some(races) => races.join(", "),
                    None => "All races".to_string(),
                };
                lines.push(Line::from(Span::styled(who, Style::default().fg(Color::Gray))));
            }
        }
        (_, None) => {}
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Details "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
