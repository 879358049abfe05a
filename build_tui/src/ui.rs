//! UI rendering

mod breakdown_view;
mod build_view;
mod forms_view;
mod help_view;
mod loadout_view;
mod mechanics_view;

use crate::app::{App, InputTarget, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status line
            Constraint::Length(3), // Keybindings footer
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);

    match app.current_tab {
        Tab::Build => build_view::draw(f, app, chunks[1]),
        Tab::Forms => forms_view::draw(f, app, chunks[1]),
        Tab::Loadout => loadout_view::draw(f, app, chunks[1]),
        Tab::Breakdown => breakdown_view::draw(f, app, chunks[1]),
        Tab::Mechanics => mechanics_view::draw(f, app, chunks[1]),
        Tab::Help => help_view::draw(f, app, chunks[1]),
    }

    draw_status(f, app, chunks[2]);
    draw_keybindings(f, app, chunks[3]);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(input) = &app.input {
        let prompt = match input.target {
            InputTarget::Level => "Level".to_string(),
            InputTarget::Manual(stat) => format!("{} points", stat.label()),
            InputTarget::AbsorbLevel => "Clone level".to_string(),
            InputTarget::PossessLevel => "Body level (empty = own level)".to_string(),
            InputTarget::PossessExtra(stat) => format!("Body {} points", stat.label()),
        };
        Line::from(vec![
            Span::styled(format!("{}: ", prompt), Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}_", input.text),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some(message) = &app.message {
        Line::from(Span::styled(message.clone(), Style::default().fg(Color::Cyan)))
    } else {
        Line::from(vec![
            Span::styled(
                format!("{} Lv.{}", race_label(app), app.selections.level()),
                Style::default().fg(Color::White),
            ),
            Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Free points: {}", app.build.free_points()),
                Style::default().fg(Color::Green),
            ),
        ])
    };

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Status "));
    f.render_widget(paragraph, area);
}

fn draw_keybindings(f: &mut Frame, app: &App, area: Rect) {
    let common_keys = vec![
        ("Tab", "Next tab"),
        ("s", "Share"),
        ("r", "Reset"),
        ("q", "Quit"),
    ];

    let tab_keys: Vec<(&str, &str)> = if app.is_editing() {
        vec![("0-9", "Type"), ("Enter", "Apply"), ("Esc", "Cancel")]
    } else {
        match app.current_tab {
            Tab::Build => vec![
                ("↑/↓", "Select"),
                ("←/→", "Adjust"),
                ("Enter", "Type value"),
                ("m", "Max stat"),
            ],
            Tab::Forms => vec![
                ("↑/↓", "Select form"),
                ("←/→", "Mastery"),
                ("Enter/Space", "Toggle"),
                ("c", "Clear"),
            ],
            Tab::Loadout => vec![
                ("↑/↓", "Select"),
                ("←/→", "Slots/Catalog"),
                ("Enter", "Equip"),
                ("u", "Unequip"),
            ],
            Tab::Breakdown => vec![("↑/↓", "Scroll")],
            Tab::Mechanics => vec![("↑/↓", "Select"), ("←/→", "Adjust"), ("Enter", "Type value")],
            Tab::Help => vec![],
        }
    };

    let mut spans: Vec<Span> = Vec::new();

    // Add tab-specific keys first
    for (i, (key, desc)) in tab_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(Color::White),
        ));
    }

    if !tab_keys.is_empty() && !app.is_editing() {
        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
    }

    if !app.is_editing() {
        for (i, (key, desc)) in common_keys.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                format!("[{}]", key),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(Color::Gray),
            ));
        }
    }

    let line = Line::from(spans);
    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(" Keys "))
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(t.name(), style))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Build Calculator "),
        )
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider("|");

    f.render_widget(tabs, area);
}

/// "Race (Subrace)" for the current selections
pub fn race_label(app: &App) -> String {
    match app.selections.subrace() {
        Some(sub) => format!("{} ({})", app.selections.race(), sub),
        None => app.selections.race().to_string(),
    }
}

pub fn section_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("═══ {} ═══", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

/// Highlight for the row under the cursor
pub fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Scroll offset that keeps `selected` inside a bordered area of `height`
pub fn scroll_to(selected: usize, height: u16) -> u16 {
    let visible = height.saturating_sub(2).max(1) as usize;
    selected.saturating_sub(visible - 1) as u16
}

/// Whole numbers without a trailing `.0`
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        format!("{:.1}", value)
    }
}

pub fn stat_line(name: &str, value: f64) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:20}", name),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format_value(value),
            Style::default().fg(Color::White),
        ),
    ])
}

pub fn stat_line_with_computed(name: &str, base: f64, computed: f64) -> Line<'static> {
    if (base - computed).abs() < 0.1 {
        stat_line(name, computed)
    } else {
        let color = if computed > base { Color::Green } else { Color::Red };
        Line::from(vec![
            Span::styled(
                format!("{:20}", name),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format_value(computed),
                Style::default().fg(color),
            ),
            Span::styled(
                format!(" (base: {})", format_value(base)),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(16.0), "16");
        assert_eq!(format_value(7.5), "7.5");
        assert_eq!(format_value(-95.0), "-95");
    }

    #[test]
    fn test_scroll_to_keeps_row_visible() {
        assert_eq!(scroll_to(0, 12), 0);
        assert_eq!(scroll_to(9, 12), 0);
        assert_eq!(scroll_to(10, 12), 1);
        assert_eq!(scroll_to(3, 0), 3);
    }
}
